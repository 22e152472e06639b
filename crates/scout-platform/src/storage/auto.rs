//! Pick the store named by the configuration.
//!
//! `Auto` tries SQLite first and falls back to memory.

use std::path::Path;

use scout_core::ports::ScoutStore;
use scout_types::{
    Result,
    config::{StorageBackendType, StorageConfig},
};

use super::{MemoryStore, SqliteStore};

/// Open the configured store as a backend-agnostic trait object.
///
/// Only an explicit `Sqlite` backend reports an open failure; `Auto`
/// degrades to memory with a warning.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn ScoutStore>> {
    let path = Path::new(&config.database_path);
    match config.backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Ok(Box::new(MemoryStore::new()))
        }
        StorageBackendType::Sqlite => {
            let store = SqliteStore::open(path)?;
            log::info!("Storage backend: SQLite ({})", path.display());
            Ok(Box::new(store))
        }
        StorageBackendType::Auto => match SqliteStore::open(path) {
            Ok(store) => {
                log::info!("Storage backend: SQLite ({})", path.display());
                Ok(Box::new(store))
            }
            Err(e) => {
                log::warn!("SQLite unavailable ({}), falling back to memory", e);
                Ok(Box::new(MemoryStore::new()))
            }
        },
    }
}
