//! Domain error taxonomy.
//!
//! Store and provider failures are classified here into the kinds the
//! application surfaces to users. Each kind decides its own user-facing
//! text and whether a retry affordance makes sense.

use std::fmt;

use tracing::{error, warn};
use tripsync_client::ProviderError;

use crate::interfaces::StoreError;

/// Result type for sync-layer operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Resource families, used to word duplicate and not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Profile,
    Group,
    Member,
    Invitation,
    Vote,
    Message,
    ItineraryItem,
    TransportBooking,
    BudgetSplit,
    SavedTrip,
    Review,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Profile => "profile",
            ResourceKind::Group => "trip group",
            ResourceKind::Member => "member",
            ResourceKind::Invitation => "invitation",
            ResourceKind::Vote => "vote",
            ResourceKind::Message => "message",
            ResourceKind::ItineraryItem => "itinerary item",
            ResourceKind::TransportBooking => "transport booking",
            ResourceKind::BudgetSplit => "budget split",
            ResourceKind::SavedTrip => "saved trip",
            ResourceKind::Review => "review",
        }
    }

    /// Message shown when a uniqueness constraint rejects an insert.
    pub fn duplicate_message(&self) -> String {
        match self {
            ResourceKind::Vote => "You've already voted for this destination".to_string(),
            ResourceKind::Member => "This user is already a member of the group".to_string(),
            ResourceKind::SavedTrip => "This trip is already saved".to_string(),
            ResourceKind::Profile => "An account with this email already exists".to_string(),
            ResourceKind::BudgetSplit => "A budget split already exists for this member".to_string(),
            other => format!("This {} already exists", other.label()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sync-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No permission, or no session at all. Terminal.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// A uniqueness constraint rejected the write.
    #[error("Duplicate {0}")]
    DuplicateEntry(ResourceKind),

    /// The referenced row is gone.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    /// Network or connectivity failure talking to the store.
    #[error("Store unavailable: {0}")]
    TransientStore(String),

    /// An external provider failed or answered with an unexpected shape.
    #[error("Provider failure: {0}")]
    ProviderFailure(ProviderError),

    /// Input rejected before any network call.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
}

impl SyncError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SyncError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: impl fmt::Display) -> Self {
        SyncError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::NotAuthorized(_) => "You don't have permission to do that".to_string(),
            SyncError::DuplicateEntry(kind) => kind.duplicate_message(),
            SyncError::NotFound { kind, .. } => format!("This {} no longer exists", kind.label()),
            SyncError::TransientStore(_) => {
                "Connection problem. Please check your network and try again".to_string()
            }
            SyncError::ProviderFailure(ProviderError::RateLimited(_)) => {
                "Too many requests. Please try again later".to_string()
            }
            SyncError::ProviderFailure(ProviderError::PaymentRequired(_)) => {
                "This service is temporarily unavailable. Please contact support".to_string()
            }
            SyncError::ProviderFailure(_) => {
                "The service didn't respond as expected. Please try again".to_string()
            }
            SyncError::Validation { message, .. } => message.clone(),
        }
    }

    /// True when offering a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::TransientStore(_) => true,
            SyncError::ProviderFailure(e) => {
                e.is_retryable() || matches!(e, ProviderError::Malformed(_))
            }
            _ => false,
        }
    }

    /// Field-level errors are rendered inline instead of as a notification.
    pub fn is_inline(&self) -> bool {
        matches!(self, SyncError::Validation { .. })
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotAuthorized(reason) => {
                warn!(reason = %reason, "Store rejected request");
                SyncError::NotAuthorized(reason)
            }
            StoreError::Duplicate { table, key } => {
                warn!(table = %table, key = %key, "Uniqueness constraint violated");
                SyncError::DuplicateEntry(table.resource_kind())
            }
            StoreError::NotFound { table, id } => SyncError::not_found(table.resource_kind(), id),
            StoreError::InvalidRow { table, reason } => {
                error!(table = %table, reason = %reason, "Store rejected row shape");
                SyncError::validation("row", reason)
            }
            StoreError::Serialization(e) => {
                error!(error = %e, "Row does not match the expected shape");
                SyncError::validation("row", e.to_string())
            }
            other => {
                error!(error = %other, "Store request failed");
                SyncError::TransientStore(other.to_string())
            }
        }
    }
}

impl From<ProviderError> for SyncError {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::Config(_) => warn!(error = %err, "Provider not configured"),
            _ => error!(error = %err, "Provider request failed"),
        }
        SyncError::ProviderFailure(err)
    }
}
