//! End-to-end collaboration scenarios over the in-memory backend.
//!
//! ```bash
//! cargo test --test collaboration --features test-utils
//! ```

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tripsync::model::{BookingRequest, ItineraryEntry, ProposedDestination, TransportMode};
use tripsync::reconciler::SyncState;
use tripsync::test_utils::Sandbox;
use tripsync::{ResourceKind, SyncError};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, day).unwrap()
}

#[tokio::test]
async fn invited_friend_joins_and_plans_the_trip() {
    let sandbox = Sandbox::new();
    let asha = sandbox.sign_up("asha@example.com", Some("Asha")).await;
    let ravi = sandbox.sign_up("ravi@example.com", Some("Ravi")).await;
    let group = sandbox.group(&asha, "Goa in December", Some(60000.0)).await;

    let ashas = sandbox.services(&asha);
    let ravis = sandbox.services(&ravi);

    ashas
        .invitations()
        .send(group.id, "Ravi@Example.com")
        .await
        .unwrap();
    let pending = ravis.invitations().pending_for_me().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].author.display_name, "Asha");

    ravis.invitations().accept(pending[0].row.id).await.unwrap();
    assert!(ravis.invitations().pending_for_me().await.unwrap().is_empty());

    let mine = ravis.groups().list_mine().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].member_count, 2);

    // Votes
    ashas
        .votes()
        .propose(
            group.id,
            ProposedDestination {
                name: "Goa".to_string(),
                cost: Some(25000.0),
                ..ProposedDestination::default()
            },
        )
        .await
        .unwrap();
    ravis.votes().cast(group.id, "Goa").await.unwrap();
    let err = ravis.votes().cast(group.id, "Goa").await.unwrap_err();
    assert!(matches!(err, SyncError::DuplicateEntry(ResourceKind::Vote)));

    let tally = ashas.votes().tally(group.id).await.unwrap();
    assert_eq!(tally[0].count, 2);
    assert_eq!(tally[0].percentage, 100.0);
    assert!(tally[0].user_voted);

    // Itinerary and transport
    ravis
        .itinerary()
        .add(
            group.id,
            ItineraryEntry::new(date(20), "Baga beach")
                .at(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), None),
        )
        .await
        .unwrap();
    ashas
        .itinerary()
        .add(group.id, ItineraryEntry::new(date(21), "Old Goa churches"))
        .await
        .unwrap();
    let days = ashas.itinerary().by_day(group.id).await.unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(20));

    ashas
        .transport()
        .add(
            group.id,
            BookingRequest {
                mode: TransportMode::Train,
                from: "Mumbai".to_string(),
                to: "Madgaon".to_string(),
                departure_date: date(19),
                return_date: None,
                price: Some(1200.0),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(ravis.transport().total_estimated(group.id).await.unwrap(), 1200.0);

    // Budget splits follow membership
    let summary = ravis.budget().overview(group.id).await.unwrap();
    assert_eq!(summary.members.len(), 2);
    assert!(summary.members.iter().all(|m| m.amount == 30000.0));
}

#[tokio::test]
async fn chat_reaches_every_open_view() {
    let sandbox = Sandbox::new();
    let asha = sandbox.sign_up("asha@example.com", Some("Asha")).await;
    let ravi = sandbox.sign_up("ravi@example.com", Some("Ravi")).await;
    let group = sandbox.group(&asha, "Spiti", None).await;
    sandbox.join(&asha, group.id, &ravi).await;

    sandbox
        .services(&asha)
        .chat()
        .send(group.id, "Packing list?")
        .await
        .unwrap();

    let mut ravis_view = sandbox.services(&ravi).chat().open(group.id).spawn();
    let snapshot = tokio::time::timeout(Duration::from_secs(1), ravis_view.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.state, SyncState::Live);
    assert_eq!(snapshot.entries.len(), 1);

    sandbox
        .services(&asha)
        .chat()
        .send(group.id, "  Thermals, lots of them  ")
        .await
        .unwrap();
    let snapshot = tokio::time::timeout(Duration::from_secs(1), ravis_view.changed())
        .await
        .unwrap()
        .unwrap();
    let last = snapshot.entries.last().unwrap();
    assert_eq!(last.row.message, "Thermals, lots of them");
    assert_eq!(last.author.display_name, "Asha");
}

#[tokio::test]
async fn removed_member_loses_access() {
    let sandbox = Sandbox::new();
    let asha = sandbox.sign_up("asha@example.com", None).await;
    let ravi = sandbox.sign_up("ravi@example.com", None).await;
    let group = sandbox.group(&asha, "Ladakh", Some(90000.0)).await;
    let membership = sandbox.join(&asha, group.id, &ravi).await;

    let ravis = sandbox.services(&ravi);
    assert_eq!(ravis.members().list(group.id).await.unwrap().len(), 2);

    sandbox
        .services(&asha)
        .members()
        .remove(group.id, membership.id)
        .await
        .unwrap();

    let err = ravis.chat().history(group.id).await.unwrap_err();
    assert!(matches!(err, SyncError::NotAuthorized(_)));
    assert!(ravis.groups().list_mine().await.unwrap().is_empty());

    // The owner's split takes the whole budget again
    let summary = sandbox.services(&asha).budget().overview(group.id).await.unwrap();
    assert_eq!(summary.members.len(), 1);
    assert_eq!(summary.members[0].amount, 90000.0);
}

#[tokio::test]
async fn outsider_sees_nothing_of_a_group() {
    let sandbox = Sandbox::new();
    let asha = sandbox.sign_up("asha@example.com", None).await;
    let group = sandbox.group(&asha, "Meghalaya", None).await;
    let outsider = sandbox.sign_up("mallory@example.com", None).await;
    let theirs = sandbox.services(&outsider);

    assert!(matches!(
        theirs.groups().get(group.id).await,
        Err(SyncError::NotFound { .. }) | Err(SyncError::NotAuthorized(_))
    ));
    assert!(matches!(
        theirs.members().list(group.id).await,
        Err(SyncError::NotAuthorized(_))
    ));
    assert!(matches!(
        theirs.invitations().send(group.id, "friend@example.com").await,
        Err(SyncError::NotAuthorized(_))
    ));
}

#[tokio::test]
async fn store_outage_is_retryable() {
    let sandbox = Sandbox::new();
    let asha = sandbox.sign_up("asha@example.com", None).await;
    let group = sandbox.group(&asha, "Kerala", None).await;

    sandbox.backend.set_offline(true).await;
    let err = sandbox
        .services(&asha)
        .chat()
        .send(group.id, "anyone?")
        .await
        .unwrap_err();
    assert!(err.is_retryable());

    sandbox.backend.set_offline(false).await;
    sandbox
        .services(&asha)
        .chat()
        .send(group.id, "anyone?")
        .await
        .unwrap();
}
