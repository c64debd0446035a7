//! Domain layer: entities, value objects and the interfaces the
//! coordinator consumes (storage, identity, notification, outbound push).

pub mod entity;
pub mod identity;
pub mod notifier;
pub mod pusher;
pub mod store;
pub mod value_object;

pub use entity::{
    DocumentSnapshot, FeedbackEntry, FeedbackRating, HireRecommendation, InvalidFeedback,
    ParticipantRecord, Role, Room, RoomStatus, TransitionViolation,
};
pub use identity::{Identity, IdentityProvider};
pub use notifier::ParticipantNotifier;
pub use pusher::{MessagePushError, MessagePusher, OutboundDrain, OutboundQueue};
pub use store::{RoomStore, StoreError};
pub use value_object::{ApplicationId, ConnectionId, InvalidRoomCode, RoomCode, Timestamp, UserId};

#[cfg(test)]
pub use store::MockRoomStore;
