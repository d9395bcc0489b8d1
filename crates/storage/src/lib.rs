#![forbid(unsafe_code)]

pub mod catalog_source;
pub mod repository;
pub mod sqlite;

pub use catalog_source::{CatalogSource, JsonFileCatalog, StaticCatalog};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
