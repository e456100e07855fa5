use super::*;
use std::time::Duration;

use crate::config::Config;
use crate::interfaces::RowBackend;
use crate::model::{GroupMessage, NewMessage, Session, TripGroup};
use crate::test_utils::Sandbox;

async fn chat_group(sandbox: &Sandbox) -> (Session, TripGroup) {
    let owner = sandbox.sign_up("asha@example.com", Some("Asha")).await;
    let group = sandbox.group(&owner, "Andaman", None).await;
    (owner, group)
}

async fn say(sandbox: &Sandbox, who: &Session, group_id: Uuid, text: &str) -> GroupMessage {
    Repository::<GroupMessage>::new(sandbox.store(who))
        .insert(&NewMessage {
            group_id,
            user_id: who.user_id,
            message: text.to_string(),
        })
        .await
        .unwrap()
}

fn reconciler(sandbox: &Sandbox, who: &Session, group_id: Uuid) -> Reconciler<GroupMessage> {
    Reconciler::new(sandbox.store(who), group_id, Config::for_test().realtime)
}

fn texts(entries: &[Joined<GroupMessage>]) -> Vec<String> {
    entries.iter().map(|e| e.row.message.clone()).collect()
}

#[tokio::test]
async fn test_start_loads_history_in_order() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    say(&sandbox, &owner, group.id, "one").await;
    say(&sandbox, &owner, group.id, "two").await;

    let mut rec = reconciler(&sandbox, &owner, group.id);
    assert_eq!(rec.state(), SyncState::Idle);
    assert_eq!(rec.start().await.unwrap(), 2);
    assert_eq!(rec.state(), SyncState::Live);
    assert_eq!(texts(rec.entries()), vec!["one", "two"]);
    assert_eq!(rec.entries()[0].author.display_name, "Asha");
}

#[tokio::test]
async fn test_pushed_insert_is_appended_with_author() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    let ravi = sandbox.sign_up("ravi@example.com", None).await;
    sandbox.join(&owner, group.id, &ravi).await;
    say(&sandbox, &owner, group.id, "hello").await;

    let mut rec = reconciler(&sandbox, &owner, group.id);
    rec.start().await.unwrap();

    let pushed = say(&sandbox, &ravi, group.id, "hi all").await;
    assert_eq!(rec.poll().await.unwrap(), ReconcileEvent::Appended(pushed.id));
    assert_eq!(texts(rec.entries()), vec!["hello", "hi all"]);
    assert_eq!(rec.entries()[1].author.display_name, "ravi");
}

#[tokio::test]
async fn test_merge_suppresses_duplicate_ids() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    let mut rec = reconciler(&sandbox, &owner, group.id);
    rec.start().await.unwrap();

    let pushed = say(&sandbox, &owner, group.id, "once").await;
    assert!(rec.merge(pushed.clone(), DisplayProfile::unknown(owner.user_id)));
    assert!(!rec.merge(pushed.clone(), DisplayProfile::unknown(owner.user_id)));

    // The same row arriving on the channel is dropped as well
    assert_eq!(rec.poll().await.unwrap(), ReconcileEvent::Duplicate(pushed.id));
    assert_eq!(rec.entries().len(), 1);
}

#[tokio::test]
async fn test_disconnect_triggers_resync() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    let mut rec = reconciler(&sandbox, &owner, group.id);
    rec.start().await.unwrap();

    sandbox.backend.feed().disconnect_all().await;
    say(&sandbox, &owner, group.id, "missed while offline").await;

    assert_eq!(rec.poll().await.unwrap(), ReconcileEvent::Resynced(1));
    assert_eq!(rec.state(), SyncState::Live);
    assert_eq!(texts(rec.entries()), vec!["missed while offline"]);

    let next = say(&sandbox, &owner, group.id, "after resync").await;
    assert_eq!(rec.poll().await.unwrap(), ReconcileEvent::Appended(next.id));
}

#[tokio::test]
async fn test_resync_gives_up_when_store_stays_down() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    let mut rec = reconciler(&sandbox, &owner, group.id);
    rec.start().await.unwrap();

    sandbox.backend.set_offline(true).await;
    sandbox.backend.feed().disconnect_all().await;

    let err = rec.poll().await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(rec.state(), SyncState::Disconnected);
}

#[tokio::test]
async fn test_non_member_cannot_start() {
    let sandbox = Sandbox::new();
    let (_, group) = chat_group(&sandbox).await;
    let outsider = sandbox.sign_up("outsider@example.com", None).await;

    let mut rec = reconciler(&sandbox, &outsider, group.id);
    let err = rec.start().await.unwrap_err();
    assert!(matches!(err, SyncError::NotAuthorized(_)));
    assert_eq!(rec.state(), SyncState::Idle);
}

#[tokio::test]
async fn test_spawned_handle_publishes_and_releases_subscription() {
    let sandbox = Sandbox::new();
    let (owner, group) = chat_group(&sandbox).await;
    say(&sandbox, &owner, group.id, "first").await;

    let mut handle = reconciler(&sandbox, &owner, group.id).spawn();
    let snapshot = tokio::time::timeout(Duration::from_secs(1), handle.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.state, SyncState::Live);
    assert_eq!(texts(&snapshot.entries), vec!["first"]);
    assert_eq!(sandbox.backend.feed().receiver_count().await, 1);

    say(&sandbox, &owner, group.id, "second").await;
    let snapshot = tokio::time::timeout(Duration::from_secs(1), handle.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(texts(&snapshot.entries), vec!["first", "second"]);

    drop(handle);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sandbox.backend.feed().receiver_count().await, 0);
}
