//! Row store policy step definitions.

use std::time::Duration;

use cucumber::{then, when};
use tripsync::interfaces::{Filter, RowStore, Table};
use tripsync::model::{GroupMessage, NewMessage, ProposedDestination};
use tripsync::repository::Repository;
use tripsync::test_utils::destination;

use super::TripWorld;

// --- When steps ---

#[when(expr = "{string} posts {string} in {string}")]
async fn when_posts(world: &mut TripWorld, name: String, text: String, group: String) {
    let result = world
        .services(&name)
        .chat()
        .send(world.group(&group), &text)
        .await;
    world.record(result);
}

#[when(expr = "{string} posts a message as {string} in {string}")]
async fn when_posts_as(world: &mut TripWorld, name: String, victim: String, group: String) {
    let store = world.context().store(world.user(&name));
    let result = Repository::<GroupMessage>::new(store)
        .insert(&NewMessage {
            group_id: world.group(&group),
            user_id: world.user(&victim).user_id,
            message: "not me".to_string(),
        })
        .await;
    world.record(result);
}

#[when(expr = "{string} reads the messages of {string}")]
async fn when_reads_messages(world: &mut TripWorld, name: String, group: String) {
    let result = world
        .services(&name)
        .chat()
        .history(world.group(&group))
        .await;
    world.record(result);
}

#[when(expr = "{string} votes for {string} in {string}")]
async fn when_votes(world: &mut TripWorld, name: String, destination: String, group: String) {
    let result = world
        .services(&name)
        .votes()
        .propose(
            world.group(&group),
            ProposedDestination {
                name: destination,
                ..ProposedDestination::default()
            },
        )
        .await;
    world.record(result);
}

#[when(expr = "{string} subscribes to the messages of {string}")]
async fn when_subscribes(world: &mut TripWorld, name: String, group: String) {
    let store = world.context().store(world.user(&name));
    let subscription = store
        .subscribe(Table::GroupMessages, Filter::group(world.group(&group)))
        .await
        .expect("subscribe failed");
    world.subscription = Some(subscription);
}

#[when(expr = "{string} saves the trip {string}")]
async fn when_saves_trip(world: &mut TripWorld, name: String, trip: String) {
    let result = world
        .services(&name)
        .saved_trips()
        .save(&destination(&trip, 12000.0))
        .await;
    world.record(result);
}

// --- Then steps ---

#[then(expr = "{string} sees {int} message(s) in {string}")]
async fn then_sees_messages(world: &mut TripWorld, name: String, count: usize, group: String) {
    let history = world
        .services(&name)
        .chat()
        .history(world.group(&group))
        .await
        .expect("history failed");
    assert_eq!(history.len(), count);
}

#[then(expr = "{string} has {int} vote(s)")]
async fn then_group_votes(world: &mut TripWorld, group: String, count: usize) {
    let owner = world.owner_of(&group).to_string();
    let tally = world
        .services(&owner)
        .votes()
        .tally(world.group(&group))
        .await
        .expect("tally failed");
    assert_eq!(tally.iter().map(|t| t.count).sum::<usize>(), count);
}

#[then(expr = "{string} receives {string}")]
async fn then_receives(world: &mut TripWorld, _name: String, text: String) {
    let subscription = world
        .subscription
        .as_mut()
        .expect("no subscription open");
    let row = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("nothing pushed in time")
        .expect("feed closed");
    assert_eq!(row["message"], text.as_str());
}

#[then(expr = "{string} has {int} saved trip(s)")]
async fn then_saved_trips(world: &mut TripWorld, name: String, count: usize) {
    let trips = world
        .services(&name)
        .saved_trips()
        .list()
        .await
        .expect("list failed");
    assert_eq!(trips.len(), count);
}
