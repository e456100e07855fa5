//! RowBackend interface tests.
//!
//! These tests verify the contract of the RowBackend trait. Each storage
//! implementation should run these tests against a fresh, empty backend.

use serde_json::{json, Value};
use uuid::Uuid;

use tripsync::interfaces::{uuid_column, Filter, Row, RowBackend, StoreError, Table};

pub fn row(value: Value) -> Row {
    value.as_object().cloned().expect("row literal must be an object")
}

fn id_of(row: &Row) -> Uuid {
    uuid_column(row, "id").expect("row should carry an id")
}

// =============================================================================
// insert / select
// =============================================================================

pub async fn test_insert_fills_defaults<B: RowBackend>(backend: &B) {
    let group = Uuid::new_v4().to_string();
    let inserted = backend
        .insert(
            Table::TripGroupMembers,
            vec![row(json!({"group_id": group, "user_id": Uuid::new_v4().to_string()}))],
        )
        .await
        .expect("insert should succeed");

    assert_eq!(inserted.len(), 1);
    assert!(uuid_column(&inserted[0], "id").is_some());
    assert_eq!(inserted[0]["role"], "member");
    assert!(inserted[0].contains_key("joined_at") || inserted[0].contains_key("created_at"));
}

pub async fn test_select_filters_and_orders<B: RowBackend>(backend: &B) {
    let group = Uuid::new_v4().to_string();
    let other = Uuid::new_v4().to_string();
    let user = Uuid::new_v4().to_string();
    for (g, day) in [(&group, "2026-12-03"), (&other, "2026-12-01"), (&group, "2026-12-02")] {
        backend
            .insert(
                Table::ItineraryItems,
                vec![row(json!({
                    "group_id": g, "user_id": user, "title": day, "day_date": day
                }))],
            )
            .await
            .expect("insert should succeed");
    }

    let rows = backend
        .select(
            Table::ItineraryItems,
            &Filter::new().eq("group_id", group.as_str()).order_by("day_date", true),
        )
        .await
        .expect("select should succeed");
    let days: Vec<&str> = rows.iter().filter_map(|r| r["day_date"].as_str()).collect();
    assert_eq!(days, ["2026-12-02", "2026-12-03"]);

    let both = backend
        .select(
            Table::ItineraryItems,
            &Filter::new().is_in("group_id", [group.as_str(), other.as_str()]),
        )
        .await
        .expect("select should succeed");
    assert_eq!(both.len(), 3);
}

pub async fn test_duplicate_rejected<B: RowBackend>(backend: &B) {
    let vote = row(json!({
        "group_id": Uuid::new_v4().to_string(),
        "user_id": Uuid::new_v4().to_string(),
        "destination_name": "Hampi",
    }));
    backend
        .insert(Table::DestinationVotes, vec![vote.clone()])
        .await
        .expect("first insert should succeed");

    let err = backend
        .insert(Table::DestinationVotes, vec![vote.clone()])
        .await
        .expect_err("second insert should fail");
    assert!(matches!(err, StoreError::Duplicate { .. }), "got {err:?}");

    let rows = backend
        .select(
            Table::DestinationVotes,
            &Filter::new().eq("group_id", vote["group_id"].clone()),
        )
        .await
        .expect("select should succeed");
    assert_eq!(rows.len(), 1);
}

pub async fn test_batch_insert_all_or_nothing<B: RowBackend>(backend: &B) {
    let user = Uuid::new_v4().to_string();
    let trip = |name: &str| row(json!({"user_id": user, "destination_name": name, "cost": 1.0}));

    let err = backend
        .insert(Table::SavedTrips, vec![trip("Ooty"), trip("Coorg"), trip("Ooty")])
        .await
        .expect_err("batch with duplicate should fail");
    assert!(matches!(err, StoreError::Duplicate { .. }));

    let rows = backend
        .select(Table::SavedTrips, &Filter::new().eq("user_id", user.as_str()))
        .await
        .expect("select should succeed");
    assert!(rows.is_empty(), "no row of a failed batch may persist");
}

// =============================================================================
// update / delete
// =============================================================================

pub async fn test_update_merges_patch<B: RowBackend>(backend: &B) {
    let inserted = backend
        .insert(
            Table::BudgetSplits,
            vec![row(json!({
                "group_id": Uuid::new_v4().to_string(),
                "user_id": Uuid::new_v4().to_string(),
                "amount": 5000.0,
            }))],
        )
        .await
        .expect("insert should succeed");
    let id = id_of(&inserted[0]);
    assert_eq!(inserted[0]["paid_amount"].as_f64(), Some(0.0));

    let updated = backend
        .update(Table::BudgetSplits, id, row(json!({"paid_amount": 1500.0})))
        .await
        .expect("update should succeed");
    assert_eq!(updated["paid_amount"].as_f64(), Some(1500.0));
    assert_eq!(updated["amount"].as_f64(), Some(5000.0));
}

pub async fn test_missing_rows_not_found<B: RowBackend>(backend: &B) {
    let id = Uuid::new_v4();
    let err = backend
        .update(Table::Reviews, id, Row::new())
        .await
        .expect_err("update of missing row should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = backend
        .delete(Table::Reviews, id)
        .await
        .expect_err("delete of missing row should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

pub async fn test_delete_frees_unique_key<B: RowBackend>(backend: &B) {
    let member = row(json!({
        "group_id": Uuid::new_v4().to_string(),
        "user_id": Uuid::new_v4().to_string(),
    }));
    let inserted = backend
        .insert(Table::TripGroupMembers, vec![member.clone()])
        .await
        .expect("insert should succeed");

    backend
        .delete(Table::TripGroupMembers, id_of(&inserted[0]))
        .await
        .expect("delete should succeed");
    backend
        .insert(Table::TripGroupMembers, vec![member])
        .await
        .expect("re-insert after delete should succeed");
}

// =============================================================================
// change feed
// =============================================================================

pub async fn test_committed_changes_are_published<B: RowBackend>(backend: &B) {
    let group = Uuid::new_v4().to_string();
    let mut sub = backend
        .feed()
        .subscribe(Table::GroupMessages, Filter::new().eq("group_id", group.as_str()))
        .await;

    backend
        .insert(
            Table::GroupMessages,
            vec![row(json!({
                "group_id": Uuid::new_v4().to_string(),
                "user_id": Uuid::new_v4().to_string(),
                "message": "elsewhere",
            }))],
        )
        .await
        .expect("insert should succeed");
    backend
        .insert(
            Table::GroupMessages,
            vec![row(json!({
                "group_id": group,
                "user_id": Uuid::new_v4().to_string(),
                "message": "here",
            }))],
        )
        .await
        .expect("insert should succeed");

    let pushed = sub.recv().await.expect("subscriber should receive the insert");
    assert_eq!(pushed["message"], "here");
    assert_eq!(sub.table(), Table::GroupMessages);
}

pub async fn test_failed_insert_not_published<B: RowBackend>(backend: &B) {
    let group = Uuid::new_v4().to_string();
    let vote = row(json!({
        "group_id": group,
        "user_id": Uuid::new_v4().to_string(),
        "destination_name": "Ziro",
    }));
    backend
        .insert(Table::DestinationVotes, vec![vote.clone()])
        .await
        .expect("insert should succeed");

    let mut sub = backend
        .feed()
        .subscribe(Table::DestinationVotes, Filter::new().eq("group_id", group.as_str()))
        .await;
    let _ = backend.insert(Table::DestinationVotes, vec![vote]).await;

    let nothing =
        tokio::time::timeout(std::time::Duration::from_millis(50), sub.recv()).await;
    assert!(nothing.is_err(), "a rejected insert must not be pushed");
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all RowBackend interface tests against a backend implementation.
#[macro_export]
macro_rules! run_row_backend_tests {
    ($backend:expr) => {
        use $crate::storage::row_backend_tests::*;

        test_insert_fills_defaults($backend).await;
        println!("  test_insert_fills_defaults: PASSED");

        test_select_filters_and_orders($backend).await;
        println!("  test_select_filters_and_orders: PASSED");

        test_duplicate_rejected($backend).await;
        println!("  test_duplicate_rejected: PASSED");

        test_batch_insert_all_or_nothing($backend).await;
        println!("  test_batch_insert_all_or_nothing: PASSED");

        test_update_merges_patch($backend).await;
        println!("  test_update_merges_patch: PASSED");

        test_missing_rows_not_found($backend).await;
        println!("  test_missing_rows_not_found: PASSED");

        test_delete_frees_unique_key($backend).await;
        println!("  test_delete_frees_unique_key: PASSED");

        test_committed_changes_are_published($backend).await;
        println!("  test_committed_changes_are_published: PASSED");

        test_failed_insert_not_published($backend).await;
        println!("  test_failed_insert_not_published: PASSED");
    };
}
