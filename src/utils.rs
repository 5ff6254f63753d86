use crate::{Error, Result, config::WriteMode, storage::Storage};
use std::{
    ffi::OsString,
    fs::{self, create_dir_all},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Appends `extension` to the file name of `path`, keeping any extension already present.
///
/// # Example
/// ```rust
/// # use bookshelf::utils::with_added_extension;
/// # use std::path::{Path, PathBuf};
/// let path = with_added_extension(Path::new("data/books.json"), "tmp");
/// assert_eq!(path, PathBuf::from("data/books.json.tmp"));
/// ```
pub fn with_added_extension(path: impl AsRef<Path>, extension: impl AsRef<str>) -> PathBuf {
    let path = path.as_ref();
    let mut file_name = path.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(".");
    file_name.push(extension.as_ref());

    return path.with_file_name(file_name);
}

/// Backup reason used for files that failed to parse
pub const FAILED_PARSING: &str = "FAILED_PARSING";

/// Returns an existing `<file>.<ts>-<reason>.bak` sibling of `path` holding exactly `data`
pub fn find_identical_backup(
    path: impl AsRef<Path>,
    reason: impl AsRef<str>,
    data: &[u8],
) -> Option<PathBuf> {
    let path = path.as_ref();
    let file_name = path.file_name()?.to_string_lossy();
    let (prefix, suffix) = (format!("{file_name}."), format!("-{}.bak", reason.as_ref()));

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    return fs::read_dir(parent)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(&suffix)
        })
        .filter(|entry| entry.metadata().is_ok_and(|m| m.len() == data.len() as u64))
        .map(|entry| entry.path())
        .find(|backup_path| fs::read(backup_path).is_ok_and(|backup| backup == data));
}

pub fn backup_failed_parse<S: Storage>(
    storage: &S,
    path: impl AsRef<Path>,
    error: serde_json::Error,
) -> Error {
    let path = path.as_ref();

    warn!(
        "Failed deserialize file at [{}], creating a new backup, caused by: [{error}]",
        path.display(),
    );

    return match storage.try_backup_storage(path, FAILED_PARSING) {
        Ok(backup_path) => {
            info!("Backup created successfully at [{}]", backup_path.display());

            Error::StoreCorrupt {
                file_path: path.to_path_buf(),
                reason: Error::DeserializationFailure(error).to_string(),
            }
        }
        Err(e) => e,
    };
}

fn try_create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|e| Error::IOCreateDirFailure {
            path: parent.display().to_string(),
            reason: e,
        })?;
    }

    if path.is_dir() {
        return Err(Error::StoreCorrupt {
            file_path: path.to_path_buf(),
            reason: std::io::ErrorKind::IsADirectory.to_string(),
        });
    }

    Ok(())
}

pub fn try_write_file(
    serialized_bytes: &[u8],
    path: impl AsRef<Path>,
    write_mode: WriteMode,
) -> Result<()> {
    let path = path.as_ref();

    try_create_parent_dir(path)?;

    return match write_mode {
        WriteMode::Overwrite => fs::write(path, serialized_bytes).map_err(|e| Error::IOWriteFailure {
            path: path.display().to_string(),
            reason: e,
        }),
        WriteMode::AtomicRename => try_write_file_atomic(serialized_bytes, path),
    };
}

/// Writes a uniquely named sibling and renames it over the target, readers see either the
/// old or the new file
fn try_write_file_atomic(serialized_bytes: &[u8], path: &Path) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let prefix = format!(
        ".{}.",
        path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
    );

    let write_failure = |reason: std::io::Error| Error::IOWriteFailure {
        path: parent.display().to_string(),
        reason,
    };

    let mut temp_file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_failure)?;
    temp_file.write_all(serialized_bytes).map_err(write_failure)?;
    temp_file.as_file().sync_all().map_err(write_failure)?;

    temp_file.persist(path).map_err(|e| Error::IORenameFailure {
        path_from: e.file.path().display().to_string(),
        path_destination: path.display().to_string(),
        reason: e.error,
    })?;

    debug!("Atomically replaced [{}].", path.display());
    return Ok(());
}

pub fn try_read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();

    return fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::StoreNotFound {
            file_path: path.to_path_buf(),
        },
        _ => Error::StoreCorrupt {
            file_path: path.to_path_buf(),
            reason: e.to_string(),
        },
    });
}

pub fn try_copy_file(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<()> {
    let (source, destination) = (source.as_ref(), destination.as_ref());

    try_create_parent_dir(destination)?;

    fs::copy(source, destination).map_err(|e| Error::IOCopyFailure {
        path_from: source.display().to_string(),
        path_destination: destination.display().to_string(),
        reason: e,
    })?;

    return Ok(());
}
