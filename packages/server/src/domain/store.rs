//! Room Store trait definition.
//!
//! The coordinator never talks to the platform's relational database
//! directly; everything durable goes through this interface. The
//! infrastructure layer provides the concrete implementation (dependency
//! inversion), and live traffic only ever creates, reads and updates —
//! deletion exists solely as a lifecycle-controller policy operation.

use async_trait::async_trait;

use super::entity::{FeedbackEntry, ParticipantRecord, Room, RoomStatus};
use super::value_object::{RoomCode, Timestamp, UserId};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("room {0:?} not found")]
    RoomNotFound(String),
    #[error("user {user} holds no participant record for room {room:?}")]
    ParticipantNotFound { room: String, user: i64 },
    #[error("room {0:?} already exists")]
    DuplicateRoom(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Durable storage interface for rooms, participant records and feedback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a freshly scheduled room together with its initial
    /// participant set (one candidate plus the invited interviewers).
    async fn create_room(
        &self,
        room: Room,
        participants: Vec<ParticipantRecord>,
    ) -> Result<(), StoreError>;

    async fn get_room(&self, code: &RoomCode) -> Result<Option<Room>, StoreError>;

    /// All rooms, newest scheduled time first, optionally filtered by status.
    async fn list_rooms(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, StoreError>;

    /// Persist a status change, stamping `started_at`/`ended_at` when given.
    /// Returns the updated room.
    async fn set_room_status(
        &self,
        code: &RoomCode,
        status: RoomStatus,
        started_at: Option<Timestamp>,
        ended_at: Option<Timestamp>,
    ) -> Result<Room, StoreError>;

    /// Persist a rescheduled time and duration. Returns the updated room.
    async fn set_schedule(
        &self,
        code: &RoomCode,
        scheduled_time: Timestamp,
        duration_minutes: u32,
    ) -> Result<Room, StoreError>;

    /// Replace the interviewer participant set. The candidate (and any
    /// observers) are retained untouched.
    async fn replace_interviewers(
        &self,
        code: &RoomCode,
        interviewers: Vec<UserId>,
    ) -> Result<(), StoreError>;

    /// Remove a room and cascade to its participant and feedback rows.
    /// Returns the removed participant records so the caller can notify
    /// the affected users.
    async fn delete_room(&self, code: &RoomCode) -> Result<Vec<ParticipantRecord>, StoreError>;

    async fn get_participant(
        &self,
        code: &RoomCode,
        user: UserId,
    ) -> Result<Option<ParticipantRecord>, StoreError>;

    async fn participants(&self, code: &RoomCode) -> Result<Vec<ParticipantRecord>, StoreError>;

    /// Reflect live presence into the durable participant record. Fields
    /// passed as `Some` are written; `None` leaves the stored value alone.
    async fn update_participant_presence(
        &self,
        code: &RoomCode,
        user: UserId,
        joined_at: Option<Timestamp>,
        left_at: Option<Timestamp>,
        is_active: bool,
    ) -> Result<(), StoreError>;

    async fn add_feedback(&self, entry: FeedbackEntry) -> Result<(), StoreError>;
}
