mod io;
pub use io::*;

use crate::Result;
use std::path::Path;

/// Represents a backing store for serialized collections, built upon [`StorageIO`]
///
/// Callers never touch the underlying medium directly; everything flows through
/// whole-snapshot reads and writes.
pub trait Storage: StorageIO {
    /// The name of the Storage
    const NAME: &str;

    /// Creates a new instance of [`Storage`] with the specified base directory where files will be stored
    ///
    /// # Errors
    /// - I/O
    fn new(dir: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized;
}
