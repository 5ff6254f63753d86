use crate::{Error, Result, config::StoreConfig, prelude::*, utils::*};
use serde::{Deserialize, Serialize};
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};
use tracing::debug;

/// File-backed store writing one JSON document per collection
#[derive(Clone, Debug)]
pub struct JsonStore {
    store_dir: PathBuf,
    config: StoreConfig,
}

impl JsonStore {
    /// Creates a [`JsonStore`] rooted at `dir` using the provided [`StoreConfig`]
    ///
    /// # Errors
    /// - I/O
    pub fn with_config(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let dir = dir.as_ref();

        create_dir_all(dir).map_err(|e| Error::IOCreateDirFailure {
            path: dir.display().to_string(),
            reason: e,
        })?;

        return Ok(Self {
            store_dir: dir.into(),
            config,
        });
    }

    pub fn config(&self) -> &StoreConfig { &self.config }
}

impl Storage for JsonStore {
    const NAME: &'static str = "JsonStore";

    fn new(dir: impl AsRef<Path>) -> Result<Self> {
        return Self::with_config(dir, StoreConfig::default());
    }
}

impl StorageIO for JsonStore {
    const EXTENSION: &'static str = "json";

    fn dir(&self) -> PathBuf {
        self.store_dir.clone()
    }

    fn try_copy_storage(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<()> {
        return try_copy_file(source, destination);
    }

    fn try_write_storage(&self, data: impl Serialize, path: impl AsRef<Path>) -> Result<()> {
        let serialized = match self.config.pretty {
            true => serde_json::to_vec_pretty(&data),
            false => serde_json::to_vec(&data),
        }
        .map_err(Error::SerializationFailure)?;

        return try_write_file(&serialized, path, self.config.write_mode);
    }

    fn try_read_storage<O: for<'a> Deserialize<'a>>(&self, path: impl AsRef<Path>) -> Result<O> {
        let file_data = try_read_file(&path)?;

        serde_json::from_slice(&file_data).map_err(|e| {
            match find_identical_backup(&path, FAILED_PARSING, &file_data) {
                Some(backup_path) => {
                    debug!(
                        "File at [{}] is still unparsable, already backed up at [{}].",
                        path.as_ref().display(),
                        backup_path.display()
                    );

                    Error::StoreCorrupt {
                        file_path: path.as_ref().to_path_buf(),
                        reason: Error::DeserializationFailure(e).to_string(),
                    }
                }
                None => backup_failed_parse(self, path, e),
            }
        })
    }
}
