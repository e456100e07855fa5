//! Per-resource table bindings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ResourceKind;
use crate::interfaces::{Filter, Table};
use crate::model::{
    BudgetSplit, DestinationVote, GroupMember, GroupMessage, Invitation, ItineraryItem,
    NewBudgetSplit, NewInvitation, NewItineraryItem, NewMember, NewMessage, NewProfile,
    NewReview, NewSavedTrip, NewTransportBooking, NewTripGroup, NewVote, Profile, Review,
    SavedTrip, TransportBooking, TripGroup,
};

/// A typed row of one table.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Shape inserted by callers; the store fills ids and timestamps.
    type Draft: Serialize + Send + Sync;

    const TABLE: Table;
    const KIND: ResourceKind;

    fn id(&self) -> Uuid;

    /// Ordering applied when a listing does not ask for one.
    fn default_order(filter: Filter) -> Filter {
        filter.order_by("created_at", true)
    }

    /// Filter selecting every row of one group.
    fn scope(group_id: Uuid) -> Filter {
        Filter::group(group_id)
    }
}

/// Rows that record which user acted.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

impl Resource for Profile {
    type Draft = NewProfile;
    const TABLE: Table = Table::Profiles;
    const KIND: ResourceKind = ResourceKind::Profile;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for TripGroup {
    type Draft = NewTripGroup;
    const TABLE: Table = Table::TripGroups;
    const KIND: ResourceKind = ResourceKind::Group;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("created_at", false)
    }

    fn scope(group_id: Uuid) -> Filter {
        Filter::new().eq("id", group_id.to_string())
    }
}

impl Authored for TripGroup {
    fn author_id(&self) -> Uuid {
        self.created_by
    }
}

impl Resource for GroupMember {
    type Draft = NewMember;
    const TABLE: Table = Table::TripGroupMembers;
    const KIND: ResourceKind = ResourceKind::Member;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("joined_at", true)
    }
}

impl Authored for GroupMember {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for Invitation {
    type Draft = NewInvitation;
    const TABLE: Table = Table::TripInvitations;
    const KIND: ResourceKind = ResourceKind::Invitation;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("created_at", false)
    }
}

impl Authored for Invitation {
    fn author_id(&self) -> Uuid {
        self.inviter_id
    }
}

impl Resource for DestinationVote {
    type Draft = NewVote;
    const TABLE: Table = Table::DestinationVotes;
    const KIND: ResourceKind = ResourceKind::Vote;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for DestinationVote {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for GroupMessage {
    type Draft = NewMessage;
    const TABLE: Table = Table::GroupMessages;
    const KIND: ResourceKind = ResourceKind::Message;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for GroupMessage {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for ItineraryItem {
    type Draft = NewItineraryItem;
    const TABLE: Table = Table::ItineraryItems;
    const KIND: ResourceKind = ResourceKind::ItineraryItem;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter
            .order_by("day_date", true)
            .order_by("start_time", true)
    }
}

impl Authored for ItineraryItem {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for TransportBooking {
    type Draft = NewTransportBooking;
    const TABLE: Table = Table::TransportBookings;
    const KIND: ResourceKind = ResourceKind::TransportBooking;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("departure_date", true)
    }
}

impl Authored for TransportBooking {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for BudgetSplit {
    type Draft = NewBudgetSplit;
    const TABLE: Table = Table::BudgetSplits;
    const KIND: ResourceKind = ResourceKind::BudgetSplit;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for BudgetSplit {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}

impl Resource for SavedTrip {
    type Draft = NewSavedTrip;
    const TABLE: Table = Table::SavedTrips;
    const KIND: ResourceKind = ResourceKind::SavedTrip;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("created_at", false)
    }
}

impl Resource for Review {
    type Draft = NewReview;
    const TABLE: Table = Table::Reviews;
    const KIND: ResourceKind = ResourceKind::Review;

    fn id(&self) -> Uuid {
        self.id
    }

    fn default_order(filter: Filter) -> Filter {
        filter.order_by("created_at", false)
    }
}

impl Authored for Review {
    fn author_id(&self) -> Uuid {
        self.user_id
    }
}
