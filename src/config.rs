use serde::{Deserialize, Serialize};

/// How a store replaces the collection file on every save
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate and rewrite the file in place. Last writer wins.
    #[default]
    Overwrite,
    /// Write a uniquely named sibling `.tmp` file, then rename it over the target
    AtomicRename,
}

/// Settings for file-backed stores
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Emit indented JSON
    pub pretty: bool,
    pub write_mode: WriteMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            write_mode: WriteMode::default(),
        }
    }
}

/// Settings for [`crate::catalog::Catalog`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    /// Storage file name, without extension, holding the collection
    pub collection_name: String,
    /// Hold an in-process lock across every load, mutate, save cycle.
    ///
    /// Off by default: concurrent mutations through the same catalog may lose updates.
    pub serialize_mutations: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            collection_name: String::from("books"),
            serialize_mutations: false,
        }
    }
}
