//! Value objects shared across the coordinator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Externally addressable room identifier.
///
/// Opaque to the coordinator: callers hand codes out over whatever channel
/// the surrounding platform uses (email, dashboard links) and clients join
/// with them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub const MAX_LEN: usize = 50;

    pub fn new(value: String) -> Result<Self, InvalidRoomCode> {
        if value.is_empty() || value.len() > Self::MAX_LEN {
            return Err(InvalidRoomCode(value));
        }
        Ok(Self(value))
    }

    /// Generate a code for a freshly scheduled room.
    ///
    /// The `INT{application}{millis}` scheme keeps codes unique per
    /// application as long as two rooms for the same application are not
    /// scheduled within the same millisecond.
    pub fn for_application(application: ApplicationId, now: Timestamp) -> Self {
        Self(format!("INT{}{}", application.value(), now.value()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = InvalidRoomCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid room code: {0:?}")]
pub struct InvalidRoomCode(pub String);

/// Durable user identifier issued by the surrounding platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the job application an interview room belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(i64);

impl ApplicationId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// Per-connection handle for one live WebSocket client.
///
/// Ephemeral and process-local; never persisted, only reflected into the
/// durable participant record's presence fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn to_rfc3339(self) -> String {
        greenroom_shared::time::timestamp_to_rfc3339(self.0)
    }
}
