//! SQLite storage integration tests.
//!
//! Run with: cargo test --test storage_sqlite --features sqlite
//!
//! Each test gets its own database file in a temporary directory, so no
//! external services are needed.

mod storage;

use std::sync::Arc;

use tempfile::TempDir;
use tripsync::config::{Config, StorageConfig, StorageType};
use tripsync::interfaces::RowBackend;
use tripsync::model::{CreateGroup, GroupMember, MemberRole, NewMember, Session};
use tripsync::repository::Repository;
use tripsync::storage::{init_storage, SessionStore, SqliteBackend};
use tripsync::test_utils::{destination, session};
use tripsync::{Services, SyncError, TripSync};

async fn connect(dir: &TempDir) -> SqliteBackend {
    let path = dir.path().join("tripsync.db");
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await
        .expect("Failed to connect to SQLite");

    let backend = SqliteBackend::new(pool);
    backend.init().await.expect("Failed to create rows table");
    backend
}

#[tokio::test]
async fn test_sqlite_row_backend() {
    println!("=== SQLite RowBackend Tests ===");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let backend = connect(&dir).await;

    run_row_backend_tests!(&backend);

    println!("=== All SQLite RowBackend tests PASSED ===");
}

#[tokio::test]
async fn test_sqlite_init_is_idempotent() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let backend = connect(&dir).await;
    backend.init().await.expect("second init should succeed");
}

#[tokio::test]
async fn test_sqlite_rows_survive_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::for_test();
    config.storage.storage_type = StorageType::Sqlite;
    config.storage.sqlite.path = dir
        .path()
        .join("nested/app.db")
        .to_string_lossy()
        .into_owned();

    let asha = session("asha@example.com");
    let group_id = {
        let app = TripSync::open(&config).await.expect("open should succeed");
        let services = app.services(Some(asha.clone())).unwrap();
        services.accounts().register(Some("Asha")).await.unwrap();
        let group = services
            .groups()
            .create(CreateGroup {
                name: "Sikkim".to_string(),
                total_budget: Some(40000.0),
                ..Default::default()
            })
            .await
            .unwrap();
        services.chat().send(group.id, "Permits sorted").await.unwrap();
        group.id
    };

    let app = TripSync::open(&config).await.expect("reopen should succeed");
    let services = app.services(Some(asha)).unwrap();
    let history = services.chat().history(group_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].author.display_name, "Asha");

    let mine = services.groups().list_mine().await.unwrap();
    assert_eq!(mine[0].group.name, "Sikkim");
}

#[tokio::test]
async fn test_sqlite_duplicate_is_classified() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let backend: Arc<dyn RowBackend> = Arc::new(connect(&dir).await);
    let store = Arc::new(SessionStore::new(backend, session("ravi@example.com")));
    let services = Services::new(store, Config::for_test().realtime);
    services.accounts().register(None).await.unwrap();

    let trip = destination("Munnar", 14000.0);
    services.saved_trips().save(&trip).await.unwrap();
    let err = services.saved_trips().save(&trip).await.unwrap_err();
    assert_eq!(err.user_message(), "This trip is already saved");
    assert!(matches!(err, SyncError::DuplicateEntry(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_concurrent_budget_overviews() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let backend: Arc<dyn RowBackend> = Arc::new(connect(&dir).await);
    let store_for = |session: &Session| Arc::new(SessionStore::new(backend.clone(), session.clone()));

    for round in 0..25 {
        let asha = session(&format!("asha{round}@example.com"));
        let ravi = session(&format!("ravi{round}@example.com"));
        let ashas_store = store_for(&asha);
        let ashas = Services::new(ashas_store.clone(), Config::for_test().realtime);
        let ravis = Services::new(store_for(&ravi), Config::for_test().realtime);
        ashas.accounts().register(Some("Asha")).await.unwrap();
        ravis.accounts().register(Some("Ravi")).await.unwrap();

        let group = ashas
            .groups()
            .create(CreateGroup {
                name: format!("Coorg {round}"),
                total_budget: Some(30000.0),
                ..Default::default()
            })
            .await
            .unwrap();
        Repository::<GroupMember>::new(ashas_store)
            .insert(&NewMember {
                group_id: group.id,
                user_id: ravi.user_id,
                role: MemberRole::Member,
            })
            .await
            .unwrap();

        let ashas_budget = ashas.budget();
        let ravis_budget = ravis.budget();
        let (first, second) = tokio::join!(
            ashas_budget.overview(group.id),
            ravis_budget.overview(group.id)
        );
        for summary in [first.unwrap(), second.unwrap()] {
            assert_eq!(summary.members.len(), 2);
            assert!(summary.members.iter().all(|m| m.amount == 15000.0));
        }
    }
}

#[tokio::test]
async fn test_init_storage_memory() {
    let backend = init_storage(&StorageConfig::memory())
        .await
        .expect("memory storage should init");
    assert_eq!(backend.feed().receiver_count().await, 0);
}
