//! Cucumber step definitions for interface tests.

pub mod collaboration;
pub mod row_store;

use std::collections::HashMap;

use cucumber::{given, then, World};
use tripsync::feed::Subscription;
use tripsync::model::{CreateGroup, GroupMember, MemberRole, NewMember, Session};
use tripsync::repository::Repository;
use tripsync::{Services, SyncError};
use uuid::Uuid;

use crate::backend::{StorageBackend, StorageContext};

/// Test context shared by the row store and collaboration features.
#[derive(World)]
#[world(init = Self::new)]
pub struct TripWorld {
    backend: StorageBackend,
    context: Option<StorageContext>,
    users: HashMap<String, Session>,
    groups: HashMap<String, Uuid>,
    owners: HashMap<Uuid, String>,
    subscription: Option<Subscription>,
    shares: Vec<f64>,
    last_error: Option<SyncError>,
}

impl std::fmt::Debug for TripWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripWorld")
            .field("backend", &self.backend)
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .field("groups", &self.groups)
            .field("subscribed", &self.subscription.is_some())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl TripWorld {
    fn new() -> Self {
        Self {
            backend: StorageBackend::from_env(),
            context: None,
            users: HashMap::new(),
            groups: HashMap::new(),
            owners: HashMap::new(),
            subscription: None,
            shares: Vec::new(),
            last_error: None,
        }
    }

    fn context(&self) -> &StorageContext {
        self.context
            .as_ref()
            .expect("Storage context not initialized")
    }

    fn user(&self, name: &str) -> &Session {
        self.users
            .get(name)
            .unwrap_or_else(|| panic!("unknown user {name}"))
    }

    fn group(&self, name: &str) -> Uuid {
        *self
            .groups
            .get(name)
            .unwrap_or_else(|| panic!("unknown group {name}"))
    }

    fn owner_of(&self, group: &str) -> &str {
        &self.owners[&self.group(group)]
    }

    fn services(&self, name: &str) -> Services {
        self.context().services(self.user(name))
    }

    /// Keep the error of a step that is expected to fail.
    fn record<T>(&mut self, result: Result<T, SyncError>) {
        self.last_error = result.err();
    }

    async fn sign_up(&mut self, name: &str) -> Session {
        let session = Session::new(Uuid::new_v4(), format!("{name}@example.com"));
        self.users.insert(name.to_string(), session.clone());
        self.services(name)
            .accounts()
            .register(Some(name))
            .await
            .expect("profile registration failed");
        session
    }
}

// --- Background ---

#[given("a row store backend")]
async fn given_row_store_backend(world: &mut TripWorld) {
    println!("Using backend: {}", world.backend.name());
    world.context = Some(StorageContext::new(world.backend).await);
}

// --- Given steps ---

#[given(expr = "a user {string}")]
async fn given_user(world: &mut TripWorld, name: String) {
    world.sign_up(&name).await;
}

#[given(expr = "a user {string} who owns the group {string}")]
async fn given_owner(world: &mut TripWorld, name: String, group: String) {
    world.sign_up(&name).await;
    let created = world
        .services(&name)
        .groups()
        .create(CreateGroup {
            name: group.clone(),
            ..CreateGroup::default()
        })
        .await
        .expect("group creation failed");
    world.groups.insert(group, created.id);
    world.owners.insert(created.id, name);
}

#[given(expr = "a user {string} who is a member of {string}")]
async fn given_member(world: &mut TripWorld, name: String, group: String) {
    let member = world.sign_up(&name).await;
    let group_id = world.group(&group);

    // The group owner adds them directly
    let owner = world.owners[&group_id].clone();
    Repository::<GroupMember>::new(world.context().store(world.user(&owner)))
        .insert(&NewMember {
            group_id,
            user_id: member.user_id,
            role: MemberRole::Member,
        })
        .await
        .expect("membership insert failed");
}

// --- Then steps ---

#[then("the request is refused as not authorized")]
async fn then_not_authorized(world: &mut TripWorld) {
    match &world.last_error {
        Some(SyncError::NotAuthorized(_)) => {}
        other => panic!("expected NotAuthorized, got {other:?}"),
    }
}

#[then(expr = "the request fails with {string}")]
async fn then_fails_with(world: &mut TripWorld, message: String) {
    let err = world.last_error.as_ref().expect("expected the request to fail");
    assert_eq!(err.user_message(), message);
}
