use crate::{Error, Result, prelude::*};
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::warn;

/// In-process store keeping serialized JSON per path. Clones share the same data.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    dir: PathBuf,
    store: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryStore {
    /// Puts raw bytes at `path`, bypassing serialization
    pub fn insert_raw(&self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        let _ = self
            .store
            .write()
            .insert(path.as_ref().to_path_buf(), bytes.into());
    }
}

impl Storage for MemoryStore {
    const NAME: &'static str = "MemoryStore";

    fn new(dir: impl AsRef<Path>) -> Result<Self> {
        return Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            store: Default::default(),
        });
    }
}

impl StorageIO for MemoryStore {
    const EXTENSION: &'static str = "memorystore";

    fn dir(&self) -> PathBuf {
        self.dir.clone()
    }

    fn try_copy_storage(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<()> {
        let source = source.as_ref();

        let mut guard = self.store.write();
        let data = guard
            .get(source)
            .cloned()
            .ok_or_else(|| Error::StoreNotFound {
                file_path: source.to_path_buf(),
            })?;
        let _ = guard.insert(destination.as_ref().to_path_buf(), data);

        return Ok(());
    }

    fn try_write_storage(&self, data: impl Serialize, path: impl AsRef<Path>) -> Result<()> {
        let serialized = serde_json::to_vec(&data).map_err(Error::SerializationFailure)?;

        let mut guard = self.store.write();
        let _ = guard.insert(path.as_ref().to_path_buf(), serialized);
        return Ok(());
    }

    fn try_read_storage<O: for<'a> Deserialize<'a>>(&self, path: impl AsRef<Path>) -> Result<O> {
        let path = path.as_ref();

        let guard = self.store.read();
        let data = guard.get(path).ok_or_else(|| Error::StoreNotFound {
            file_path: path.to_path_buf(),
        })?;

        serde_json::from_slice(data).map_err(|e| {
            warn!(
                "Failed deserialize collection at [{}], caused by: [{e}]",
                path.display()
            );

            return Error::StoreCorrupt {
                file_path: path.to_path_buf(),
                reason: Error::DeserializationFailure(e).to_string(),
            };
        })
    }
}
