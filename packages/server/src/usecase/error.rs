//! Use case error types.
//!
//! The taxonomy follows the coordinator's access policy: `Unauthorized`
//! (no matching participant record or unverified identity — nothing is
//! mutated), `NotFound` (unknown room code), `InvalidTransition` (illegal
//! status edge — room unchanged), protected/terminal-room violations
//! (mapped to 403 at the HTTP edge) and storage failures, which always
//! surface to the caller.

use crate::domain::{RoomStatus, StoreError};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("unparseable scheduled time {0:?}")]
    InvalidScheduledTime(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RescheduleError {
    #[error("room not found")]
    RoomNotFound,
    #[error("unparseable scheduled time {0:?}")]
    InvalidScheduledTime(String),
    #[error("cannot reschedule a {from:?} room")]
    InvalidTransition { from: RoomStatus },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("room not found")]
    RoomNotFound,
    #[error("illegal status transition {from:?} -> {to:?}")]
    InvalidTransition { from: RoomStatus, to: RoomStatus },
    #[error("completed rooms cannot be mutated")]
    CompletedRoomProtected,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DeleteError {
    #[error("room not found")]
    RoomNotFound,
    #[error("completed rooms cannot be deleted")]
    CompletedRoomProtected,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum JoinError {
    /// No matching durable participant record, or the identity is not
    /// verified. The operation mutates nothing and notifies no peers.
    #[error("identity is not authorized for this room")]
    Unauthorized,
    #[error("room not found")]
    RoomNotFound,
    /// Cancelled rooms reject all registration.
    #[error("room is cancelled")]
    RoomClosed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("connection is not registered in any room")]
    NotInRoom,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FeedbackError {
    #[error("room not found")]
    RoomNotFound,
    #[error("only interviewers assigned to the room may submit feedback")]
    NotAnInterviewer,
    #[error("room has no candidate participant")]
    MissingCandidate,
    #[error(transparent)]
    Invalid(#[from] crate::domain::InvalidFeedback),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RoomQueryError {
    #[error("room not found")]
    RoomNotFound,
    #[error("unknown status filter {0:?}")]
    InvalidStatusFilter(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
