//! Shared editor snapshots, one per room.
//!
//! Holds the latest content only: last write wins, concurrent edits may
//! interleave without merging. Snapshots exist purely in memory and are
//! discarded once a room has had no live connections for a grace period,
//! bounding memory across abandoned rooms.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::{DocumentSnapshot, RoomCode, Timestamp};

use super::presence::PresenceTracker;

/// Room-scoped store of the current editor snapshot.
#[derive(Default)]
pub struct DocumentStore {
    inner: Mutex<HashMap<RoomCode, DocumentSnapshot>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the room's snapshot, creating it on first edit.
    pub async fn update(
        &self,
        room: &RoomCode,
        content: String,
        language: String,
        at: Timestamp,
    ) -> DocumentSnapshot {
        let snapshot = DocumentSnapshot {
            content,
            language,
            updated_at: at,
        };
        self.inner
            .lock()
            .await
            .insert(room.clone(), snapshot.clone());
        snapshot
    }

    pub async fn get(&self, room: &RoomCode) -> Option<DocumentSnapshot> {
        self.inner.lock().await.get(room).cloned()
    }

    /// Drop a room's snapshot. Returns whether one existed.
    pub async fn discard(&self, room: &RoomCode) -> bool {
        self.inner.lock().await.remove(room).is_some()
    }
}

/// Discard a room's snapshot after `grace`, unless someone reconnected in
/// the meantime. Spawned when the last live connection of a room leaves.
pub fn schedule_discard(
    documents: Arc<DocumentStore>,
    presence: Arc<PresenceTracker>,
    room: RoomCode,
    grace: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if presence.connection_count(&room).await > 0 {
            return;
        }
        if documents.discard(&room).await {
            tracing::debug!("Discarded idle document snapshot for room '{}'", room);
        }
    });
}
