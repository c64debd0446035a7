//! UseCase: shared editor updates.
//!
//! Overwrites the room's snapshot (last writer wins, no merging) and fans
//! the pre-serialized `document_updated` event out to every other live
//! connection in the sender's room.

use std::sync::Arc;

use greenroom_shared::time::Clock;

use crate::domain::{ConnectionId, DocumentSnapshot, MessagePusher, Timestamp};
use crate::infrastructure::document::DocumentStore;
use crate::infrastructure::presence::PresenceTracker;

use super::error::DocumentError;

pub struct UpdateDocumentUseCase {
    presence: Arc<PresenceTracker>,
    documents: Arc<DocumentStore>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl UpdateDocumentUseCase {
    pub fn new(
        presence: Arc<PresenceTracker>,
        documents: Arc<DocumentStore>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence,
            documents,
            pusher,
            clock,
        }
    }

    /// Store the new content and broadcast `message` to the sender's
    /// room-mates. Returns the snapshot as stored.
    pub async fn execute(
        &self,
        from: &ConnectionId,
        content: String,
        language: String,
        message: String,
    ) -> Result<DocumentSnapshot, DocumentError> {
        let sender = self
            .presence
            .get(from)
            .await
            .ok_or(DocumentError::NotInRoom)?;

        let now = Timestamp::new(self.clock.now_utc_millis());
        let snapshot = self
            .documents
            .update(&sender.room, content, language, now)
            .await;

        let targets: Vec<ConnectionId> = self
            .presence
            .list_peers(&sender.room, Some(from))
            .await
            .into_iter()
            .map(|peer| peer.connection)
            .collect();
        if let Err(e) = self.pusher.broadcast(targets, &message).await {
            tracing::warn!(
                "Failed to broadcast document update in room '{}': {}",
                sender.room,
                e
            );
        }

        Ok(snapshot)
    }
}
