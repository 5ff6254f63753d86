#[cfg(feature = "json")]
pub mod jsonstore;
#[cfg(feature = "json")]
pub use jsonstore::*;

#[cfg(feature = "memory")]
pub mod memorystore;
#[cfg(feature = "memory")]
pub use memorystore::*;
