//! Typed projections of store rows.
//!
//! Each entity has a row type (as read back, with id and timestamps) and a
//! `New*` draft (as inserted). Form inputs that omit the acting user carry
//! their own types.

mod budget;
mod group;
mod invitation;
mod itinerary;
mod message;
mod profile;
mod session;
mod transport;
mod trips;
mod vote;

pub use budget::{BudgetSplit, NewBudgetSplit};
pub use group::{
    CreateGroup, GroupMember, GroupOverview, MemberRole, NewMember, NewTripGroup, TripGroup,
};
pub use invitation::{Invitation, InvitationStatus, NewInvitation};
pub use itinerary::{ItineraryEntry, ItineraryItem, NewItineraryItem};
pub use message::{GroupMessage, NewMessage};
pub use profile::{NewProfile, Profile};
pub use session::Session;
pub use transport::{
    BookingRequest, NewTransportBooking, TransportBooking, TransportMode, ROUND_TRIP_MULTIPLIER,
};
pub use trips::{NewReview, NewSavedTrip, Review, SavedTrip};
pub use vote::{DestinationVote, NewVote, ProposedDestination};
