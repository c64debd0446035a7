//! UseCase: register a live connection in a room.
//!
//! The operation is split in two phases so the WebSocket handler can
//! reject a join before upgrading the socket without ever mutating state:
//!
//! 1. [`JoinRoomUseCase::authorize`] — read-only checks against the Room
//!    Store (room exists, not cancelled, identity verified and holding a
//!    participant record).
//! 2. [`JoinRoomUseCase::register`] — in-memory registration (presence +
//!    outbound queue) followed by the durable attendance write. The
//!    durable write happens after the in-memory locks are released; if it
//!    fails, the registration is rolled back and the join fails as a
//!    whole, so peers never observe a half-joined connection.

use std::sync::Arc;

use greenroom_shared::time::Clock;

use crate::domain::{
    ConnectionId, DocumentSnapshot, Identity, MessagePusher, OutboundQueue, ParticipantRecord,
    Role, Room, RoomCode, RoomStatus, RoomStore, Timestamp,
};
use crate::infrastructure::document::DocumentStore;
use crate::infrastructure::presence::{LiveConnection, PeerSnapshot, PresenceTracker};

use super::error::JoinError;

/// Proof that an identity may enter a room, produced by `authorize`.
#[derive(Debug, Clone)]
pub struct JoinAuthorization {
    pub room: Room,
    pub participant: ParticipantRecord,
}

/// What a freshly registered connection needs to know.
#[derive(Debug)]
pub struct JoinOutcome {
    pub role: Role,
    /// Members present at registration time, excluding the joiner.
    pub peers: Vec<PeerSnapshot>,
    /// Current shared editor content, replayed to the joiner if present.
    pub snapshot: Option<DocumentSnapshot>,
}

pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
    presence: Arc<PresenceTracker>,
    documents: Arc<DocumentStore>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        presence: Arc<PresenceTracker>,
        documents: Arc<DocumentStore>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            presence,
            documents,
            pusher,
            clock,
        }
    }

    /// Read-only authorization. Mutates nothing and notifies no peers.
    pub async fn authorize(
        &self,
        code: &RoomCode,
        identity: &Identity,
    ) -> Result<JoinAuthorization, JoinError> {
        if !identity.verified {
            return Err(JoinError::Unauthorized);
        }
        let room = self
            .store
            .get_room(code)
            .await?
            .ok_or(JoinError::RoomNotFound)?;
        if room.status == RoomStatus::Cancelled {
            return Err(JoinError::RoomClosed);
        }
        let participant = self
            .store
            .get_participant(code, identity.user_id)
            .await?
            .ok_or(JoinError::Unauthorized)?;
        Ok(JoinAuthorization { room, participant })
    }

    /// Register the live connection and reflect it into the durable record.
    pub async fn register(
        &self,
        connection: ConnectionId,
        auth: &JoinAuthorization,
        queue: OutboundQueue,
    ) -> Result<JoinOutcome, JoinError> {
        let now = Timestamp::new(self.clock.now_utc_millis());
        let live = LiveConnection {
            id: connection,
            room: auth.room.code.clone(),
            user: auth.participant.user,
            role: auth.participant.role,
            connected_at: now,
        };

        if let Some(displaced) = self.presence.register(live).await {
            tracing::warn!(
                "Connection '{}' re-registered; displaced prior membership in room '{}'",
                connection,
                displaced.room
            );
        }
        self.pusher.register_connection(connection, queue).await;

        if let Err(e) = self
            .store
            .update_participant_presence(
                &auth.room.code,
                auth.participant.user,
                Some(now),
                None,
                true,
            )
            .await
        {
            // fail the whole join rather than leave presence diverging
            // from the durable record
            self.presence.unregister(&connection).await;
            self.pusher.unregister_connection(&connection).await;
            return Err(JoinError::Store(e));
        }

        let peers = self.presence.list_peers(&auth.room.code, Some(&connection)).await;
        let snapshot = self.documents.get(&auth.room.code).await;
        tracing::info!(
            "User {} joined room '{}' as {:?} (connection '{}')",
            auth.participant.user,
            auth.room.code,
            auth.participant.role,
            connection
        );
        Ok(JoinOutcome {
            role: auth.participant.role,
            peers,
            snapshot,
        })
    }

    /// Fan a pre-serialized `peer_joined` event out to everyone else in
    /// the room.
    pub async fn broadcast_peer_joined(
        &self,
        room: &RoomCode,
        joined: &ConnectionId,
        message: &str,
    ) {
        let targets: Vec<ConnectionId> = self
            .presence
            .list_peers(room, Some(joined))
            .await
            .into_iter()
            .map(|peer| peer.connection)
            .collect();
        if let Err(e) = self.pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast peer-joined in room '{}': {}", room, e);
        }
    }
}
