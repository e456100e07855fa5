//! Group collaboration step definitions.

use cucumber::{given, then, when};

use super::TripWorld;

// --- Given steps ---

#[given(expr = "{string} has a budget of {float}")]
async fn given_budget(world: &mut TripWorld, group: String, budget: f64) {
    let owner = world.owner_of(&group).to_string();
    world
        .services(&owner)
        .groups()
        .set_budget(world.group(&group), Some(budget))
        .await
        .expect("set budget failed");
}

// --- When steps ---

#[when(expr = "{string} invites {string} to {string}")]
async fn when_invites(world: &mut TripWorld, name: String, email: String, group: String) {
    let result = world
        .services(&name)
        .invitations()
        .send(world.group(&group), &email)
        .await;
    world.record(result);
}

#[when(expr = "{string} accepts the invitation to {string}")]
async fn when_accepts(world: &mut TripWorld, name: String, group: String) {
    let group_id = world.group(&group);
    let invitations = world.services(&name).invitations();
    let invitation = invitations
        .pending_for_me()
        .await
        .expect("pending invitations failed")
        .into_iter()
        .find(|i| i.row.group_id == group_id)
        .expect("no pending invitation for the group");

    let result = invitations.accept(invitation.row.id).await;
    world.record(result);
}

#[when(expr = "{string} opens the budget of {string}")]
async fn when_opens_budget(world: &mut TripWorld, name: String, group: String) {
    let summary = world
        .services(&name)
        .budget()
        .overview(world.group(&group))
        .await
        .expect("budget overview failed");
    world.shares = summary.members.iter().map(|m| m.amount).collect();
}

#[when(expr = "{string} removes {string} from {string}")]
async fn when_removes(world: &mut TripWorld, name: String, member: String, group: String) {
    let group_id = world.group(&group);
    let user_id = world.user(&member).user_id;
    let members = world.services(&name).members();
    let membership = members
        .list(group_id)
        .await
        .expect("member list failed")
        .into_iter()
        .find(|m| m.row.user_id == user_id)
        .expect("user is not a member");

    let result = members.remove(group_id, membership.row.id).await;
    world.record(result);
}

// --- Then steps ---

#[then(expr = "{string} has {int} members")]
async fn then_member_count(world: &mut TripWorld, group: String, count: usize) {
    let owner = world.owner_of(&group).to_string();
    let members = world
        .services(&owner)
        .members()
        .list(world.group(&group))
        .await
        .expect("member list failed");
    assert_eq!(members.len(), count);
}

#[then(expr = "{string} has no pending invitations")]
async fn then_no_pending(world: &mut TripWorld, name: String) {
    let pending = world
        .services(&name)
        .invitations()
        .pending_for_me()
        .await
        .expect("pending invitations failed");
    assert!(pending.is_empty(), "still pending: {}", pending.len());
}

#[then(expr = "every share of {string} is {float}")]
async fn then_every_share(world: &mut TripWorld, _group: String, amount: f64) {
    assert!(!world.shares.is_empty(), "no shares computed");
    for share in &world.shares {
        assert!((share - amount).abs() < 0.01, "share {share} != {amount}");
    }
}
