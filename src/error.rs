use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error, Display)]
pub enum Error {
    // -- I/O
    #[display("Directory creation at [{path}] failed, caused by: [{reason}]")]
    IOCreateDirFailure {
        path: String,
        reason: std::io::Error,
    },

    #[display("Copy from [{path_from}] to [{path_destination}] failed, caused by: [{reason}]")]
    IOCopyFailure {
        path_from: String,
        path_destination: String,
        reason: std::io::Error,
    },

    #[display("Write to file at [{path}] failed, caused by: [{reason}]")]
    IOWriteFailure {
        path: String,
        reason: std::io::Error,
    },

    #[display("Rename from [{path_from}] to [{path_destination}] failed, caused by: [{reason}]")]
    IORenameFailure {
        path_from: String,
        path_destination: String,
        reason: std::io::Error,
    },

    // -- Serde
    #[display("Serialization failed, caused by: [{_0}]")]
    SerializationFailure(serde_json::Error),

    #[display("Deserialization failed, caused by: [{_0}]")]
    DeserializationFailure(serde_json::Error),

    // -- Store
    #[display("Store at [{}] not found.", file_path.display())]
    StoreNotFound { file_path: PathBuf },

    #[display("Store at [{}] is corrupt, caused by: [{reason}]", file_path.display())]
    StoreCorrupt { file_path: PathBuf, reason: String },
}
