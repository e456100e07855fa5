//! Row store backends and the session policy layer.
//!
//! Backends:
//! - memory: in-process tables, always available
//! - sqlite: durable tables via sqlx (feature `sqlite`)
//!
//! Repositories never see a backend directly; they get a [`SessionStore`]
//! bound to the caller.

pub mod memory;
pub mod policy;
pub mod procedures;
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use tracing::info;
#[cfg(not(feature = "sqlite"))]
use tracing::error;

pub use crate::config::{StorageConfig, StorageType};
pub use memory::MemoryBackend;
pub use policy::SessionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

#[cfg(feature = "sqlite")]
use crate::feed::ChangeFeed;
use crate::interfaces::{Result, RowBackend, StoreError};

/// Initialize the configured row backend.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn RowBackend>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: memory");
            Ok(Arc::new(MemoryBackend::with_feed_capacity(
                config.change_feed_capacity,
            )))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!("Storage: sqlite at {}", config.sqlite.path);
            if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.sqlite.path))
                    .await?;
            let backend =
                SqliteBackend::with_feed(pool, ChangeFeed::new(config.change_feed_capacity));
            backend.init().await?;
            Ok(Arc::new(backend))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err(StoreError::Unavailable(
                "sqlite feature not enabled".to_string(),
            ))
        }
    }
}
