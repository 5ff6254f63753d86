#![doc = include_str!("../README.md")]

pub mod book;
pub mod catalog;
pub mod config;
pub mod engine;
mod error;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::{
        book::{BookData, BookRecord, Condition},
        catalog::{Catalog, CatalogEvent, MutationOutcome},
        config::{CatalogOptions, StoreConfig, WriteMode},
        engine::*,
        storage::*,
    };
}
