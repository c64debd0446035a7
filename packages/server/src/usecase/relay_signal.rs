//! UseCase: relay call-negotiation messages between two peers.
//!
//! Unicast and best-effort. Call setup races with disconnects as a matter
//! of course, so a vanished target is normal traffic: the message is
//! dropped and logged, never surfaced to the sender as an error. The relay
//! is scoped to a room — a target living in a different room is dropped
//! the same way.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};
use crate::infrastructure::presence::PresenceTracker;

/// What happened to one relayed message. Only observability and tests
/// care; senders never see an error either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDisposition {
    Delivered,
    SenderUnknown,
    TargetGone,
    CrossRoom,
}

pub struct RelaySignalUseCase {
    presence: Arc<PresenceTracker>,
    pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(presence: Arc<PresenceTracker>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { presence, pusher }
    }

    /// Deliver a pre-serialized `signal` event to `to`, if it is still a
    /// live connection in the sender's room.
    pub async fn execute(
        &self,
        from: &ConnectionId,
        to: &ConnectionId,
        message: &str,
    ) -> RelayDisposition {
        let Some(sender) = self.presence.get(from).await else {
            tracing::warn!("Dropping signal from unregistered connection '{}'", from);
            return RelayDisposition::SenderUnknown;
        };
        let Some(target) = self.presence.get(to).await else {
            tracing::debug!(
                "Dropping signal from '{}' to vanished connection '{}'",
                from,
                to
            );
            return RelayDisposition::TargetGone;
        };
        if target.room != sender.room {
            tracing::warn!(
                "Dropping cross-room signal from '{}' (room '{}') to '{}' (room '{}')",
                from,
                sender.room,
                to,
                target.room
            );
            return RelayDisposition::CrossRoom;
        }
        if let Err(e) = self.pusher.push_to(to, message).await {
            // target unregistered between the lookup and the push
            tracing::debug!("Signal delivery to '{}' failed: {}", to, e);
            return RelayDisposition::TargetGone;
        }
        RelayDisposition::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutboundDrain, OutboundQueue, Role, RoomCode, Timestamp, UserId};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::presence::LiveConnection;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    struct Fixture {
        presence: Arc<PresenceTracker>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: RelaySignalUseCase,
    }

    fn fixture() -> Fixture {
        let presence = Arc::new(PresenceTracker::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = RelaySignalUseCase::new(presence.clone(), pusher.clone());
        Fixture {
            presence,
            pusher,
            usecase,
        }
    }

    async fn connect(f: &Fixture, room: &str, user: i64) -> (ConnectionId, OutboundDrain) {
        let id = ConnectionId::generate();
        f.presence
            .register(LiveConnection {
                id,
                room: code(room),
                user: UserId::new(user),
                role: Role::Interviewer,
                connected_at: Timestamp::new(1),
            })
            .await;
        let (queue, drain) = OutboundQueue::bounded(8);
        f.pusher.register_connection(id, queue).await;
        (id, drain)
    }

    #[tokio::test]
    async fn signal_reaches_a_live_peer_exactly_once_and_unchanged() {
        let f = fixture();
        let (from, _from_drain) = connect(&f, "R1", 1).await;
        let (to, mut to_drain) = connect(&f, "R1", 2).await;
        let message = r#"{"type":"signal","kind":"offer","payload":{"sdp":"v=0"},"from":"x"}"#;

        let disposition = f.usecase.execute(&from, &to, message).await;

        assert_eq!(disposition, RelayDisposition::Delivered);
        assert_eq!(to_drain.recv().await.as_deref(), Some(message));
        // exactly once: nothing else queued
        assert!(f.pusher.push_to(&to, "probe").await.is_ok());
        assert_eq!(to_drain.recv().await.as_deref(), Some("probe"));
    }

    #[tokio::test]
    async fn vanished_target_is_dropped_silently() {
        let f = fixture();
        let (from, _from_drain) = connect(&f, "R1", 1).await;
        let gone = ConnectionId::generate();

        let disposition = f.usecase.execute(&from, &gone, "{}").await;

        assert_eq!(disposition, RelayDisposition::TargetGone);
    }

    #[tokio::test]
    async fn cross_room_targets_are_not_reachable() {
        let f = fixture();
        let (from, _from_drain) = connect(&f, "R1", 1).await;
        let (other, mut other_drain) = connect(&f, "R2", 2).await;

        let disposition = f.usecase.execute(&from, &other, "{}").await;

        assert_eq!(disposition, RelayDisposition::CrossRoom);
        // nothing was queued for the other room's connection
        f.pusher.push_to(&other, "probe").await.unwrap();
        assert_eq!(other_drain.recv().await.as_deref(), Some("probe"));
    }

    #[tokio::test]
    async fn unregistered_sender_cannot_relay() {
        let f = fixture();
        let (to, _to_drain) = connect(&f, "R1", 2).await;

        let disposition = f
            .usecase
            .execute(&ConnectionId::generate(), &to, "{}")
            .await;

        assert_eq!(disposition, RelayDisposition::SenderUnknown);
    }
}
