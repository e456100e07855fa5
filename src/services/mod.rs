//! Collaborative services.
//!
//! Resource-specific operations on top of the generic repositories. A
//! [`Services`] bundle is built for one session; every service it hands out
//! acts as that session's user.

pub mod accounts;
pub mod budget;
pub mod chat;
pub mod groups;
pub mod invitations;
pub mod itinerary;
pub mod members;
pub mod reviews;
pub mod saved_trips;
pub mod transport;
pub mod votes;

pub use accounts::AccountService;
pub use budget::BudgetService;
pub use chat::ChatService;
pub use groups::GroupService;
pub use invitations::InvitationService;
pub use itinerary::{trip_days, DayPlan, ItineraryService};
pub use members::MemberService;
pub use reviews::ReviewService;
pub use saved_trips::SavedTripService;
pub use transport::{estimate_price, TransportService};
pub use votes::VoteService;

use std::sync::Arc;

use uuid::Uuid;

use crate::config::RealtimeConfig;
use crate::error::{Result, SyncError};
use crate::interfaces::RowStore;
use crate::model::Session;

/// Session-scoped entry point to every collaborative service.
#[derive(Clone)]
pub struct Services {
    store: Arc<dyn RowStore>,
    realtime: RealtimeConfig,
}

impl Services {
    pub fn new(store: Arc<dyn RowStore>, realtime: RealtimeConfig) -> Self {
        Self { store, realtime }
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone())
    }

    pub fn groups(&self) -> GroupService {
        GroupService::new(self.store.clone())
    }

    pub fn members(&self) -> MemberService {
        MemberService::new(self.store.clone())
    }

    pub fn invitations(&self) -> InvitationService {
        InvitationService::new(self.store.clone())
    }

    pub fn votes(&self) -> VoteService {
        VoteService::new(self.store.clone())
    }

    pub fn chat(&self) -> ChatService {
        ChatService::new(self.store.clone(), self.realtime.clone())
    }

    pub fn itinerary(&self) -> ItineraryService {
        ItineraryService::new(self.store.clone())
    }

    pub fn transport(&self) -> TransportService {
        TransportService::new(self.store.clone())
    }

    pub fn budget(&self) -> BudgetService {
        BudgetService::new(self.store.clone())
    }

    pub fn saved_trips(&self) -> SavedTripService {
        SavedTripService::new(self.store.clone())
    }

    pub fn reviews(&self) -> ReviewService {
        ReviewService::new(self.store.clone())
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("user_id", &self.session().user_id)
            .finish()
    }
}

/// Trimmed text, or a validation error carrying `message`.
pub(crate) fn required_text(field: &'static str, value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation(field, message));
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional text; blank collapses to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn caller(store: &Arc<dyn RowStore>) -> Uuid {
    store.session().user_id
}
