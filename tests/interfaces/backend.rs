//! Backend factory for interface tests.
//!
//! Provides a unified interface to create row backends based on environment configuration.

use std::env;
use std::sync::Arc;

use tripsync::config::Config;
use tripsync::interfaces::{RowBackend, RowStore};
use tripsync::model::Session;
use tripsync::storage::{MemoryBackend, SessionStore};
use tripsync::Services;

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl StorageBackend {
    pub fn from_env() -> Self {
        match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StorageBackend::Sqlite,
            _ => StorageBackend::Memory,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

/// Holds the backend for one scenario.
pub struct StorageContext {
    pub backend: Arc<dyn RowBackend>,
    /// Temp dir to keep the SQLite file alive.
    #[allow(dead_code)]
    dir: Option<tempfile::TempDir>,
}

impl std::fmt::Debug for StorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("backend", &"<dyn RowBackend>")
            .field("dir", &self.dir)
            .finish()
    }
}

impl StorageContext {
    /// Create a storage context for the configured backend.
    pub async fn new(backend: StorageBackend) -> Self {
        match backend {
            StorageBackend::Memory => StorageContext {
                backend: Arc::new(MemoryBackend::new()),
                dir: None,
            },
            StorageBackend::Sqlite => Self::create_sqlite().await,
        }
    }

    #[cfg(feature = "sqlite")]
    async fn create_sqlite() -> Self {
        use tripsync::storage::SqliteBackend;

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("interfaces.db");
        let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .expect("Failed to create SQLite pool");

        let backend = SqliteBackend::new(pool);
        backend.init().await.expect("Failed to create rows table");

        StorageContext {
            backend: Arc::new(backend),
            dir: Some(dir),
        }
    }

    #[cfg(not(feature = "sqlite"))]
    async fn create_sqlite() -> Self {
        panic!("SQLite feature not enabled. Build with --features sqlite");
    }

    /// Policy-checked store acting as `session`.
    pub fn store(&self, session: &Session) -> Arc<dyn RowStore> {
        Arc::new(SessionStore::new(self.backend.clone(), session.clone()))
    }

    pub fn services(&self, session: &Session) -> Services {
        Services::new(self.store(session), Config::for_test().realtime)
    }
}
