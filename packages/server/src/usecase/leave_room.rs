//! UseCase: unregister a live connection.
//!
//! Shared by the graceful `leave` event and the abnormal-disconnect path;
//! the presence tracker's idempotent unregister guarantees the cleanup
//! runs exactly once per connection no matter how many paths race to it.
//! The durable attendance update happens after the in-memory removal and
//! is logged (not surfaced) on failure — the socket is already gone, so
//! a brief divergence between live and durable state is the accepted
//! trade-off.

use std::sync::Arc;

use greenroom_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomStore, Timestamp};
use crate::infrastructure::presence::{LiveConnection, PresenceTracker};

/// What remains of a room after one connection left.
#[derive(Debug)]
pub struct LeaveOutcome {
    pub connection: LiveConnection,
    /// Everyone still in the room, to receive `peer_left`.
    pub notify_targets: Vec<ConnectionId>,
    pub remaining: usize,
}

pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
    presence: Arc<PresenceTracker>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        presence: Arc<PresenceTracker>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            presence,
            pusher,
            clock,
        }
    }

    /// Unregister a connection. Returns `None` when the connection was
    /// already gone (second invocation, unknown id), in which case nothing
    /// happens.
    pub async fn execute(&self, connection: &ConnectionId) -> Option<LeaveOutcome> {
        let live = self.presence.unregister(connection).await?;
        self.pusher.unregister_connection(connection).await;

        let notify_targets: Vec<ConnectionId> = self
            .presence
            .list_peers(&live.room, None)
            .await
            .into_iter()
            .map(|peer| peer.connection)
            .collect();
        let remaining = notify_targets.len();

        let now = Timestamp::new(self.clock.now_utc_millis());
        if let Err(e) = self
            .store
            .update_participant_presence(&live.room, live.user, None, Some(now), false)
            .await
        {
            tracing::warn!(
                "Failed to record departure of user {} from room '{}': {}",
                live.user,
                live.room,
                e
            );
        }

        tracing::info!(
            "User {} left room '{}' (connection '{}', {} remaining)",
            live.user,
            live.room,
            connection,
            remaining
        );
        Some(LeaveOutcome {
            connection: live,
            notify_targets,
            remaining,
        })
    }

    /// Fan a pre-serialized `peer_left` event out to the remaining members.
    pub async fn broadcast_peer_left(&self, targets: Vec<ConnectionId>, message: &str) {
        if let Err(e) = self.pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast peer-left: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ApplicationId, OutboundQueue, ParticipantRecord, Role, Room, RoomCode, RoomStatus, UserId,
    };
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomStore;
    use greenroom_shared::time::FixedClock;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryRoomStore>,
        presence: Arc<PresenceTracker>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: LeaveRoomUseCase,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRoomStore::new());
        store
            .create_room(
                Room {
                    code: code("R1"),
                    label: "Interview".to_string(),
                    application: ApplicationId::new(1),
                    scheduled_time: Timestamp::new(1_000),
                    duration_minutes: 60,
                    status: RoomStatus::Scheduled,
                    created_by: UserId::new(9),
                    created_at: Timestamp::new(500),
                    started_at: None,
                    ended_at: None,
                },
                vec![
                    ParticipantRecord::new(code("R1"), UserId::new(1), Role::Candidate),
                    ParticipantRecord::new(code("R1"), UserId::new(2), Role::Interviewer),
                ],
            )
            .await
            .unwrap();
        let presence = Arc::new(PresenceTracker::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = LeaveRoomUseCase::new(
            store.clone(),
            presence.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(99_000)),
        );
        Fixture {
            store,
            presence,
            pusher,
            usecase,
        }
    }

    async fn connect(f: &Fixture, user: i64, role: Role) -> ConnectionId {
        let id = ConnectionId::generate();
        f.presence
            .register(LiveConnection {
                id,
                room: code("R1"),
                user: UserId::new(user),
                role,
                connected_at: Timestamp::new(1),
            })
            .await;
        let (queue, _drain) = OutboundQueue::bounded(4);
        f.pusher.register_connection(id, queue).await;
        id
    }

    #[tokio::test]
    async fn leaving_reports_the_remaining_members() {
        let f = fixture().await;
        let candidate = connect(&f, 1, Role::Candidate).await;
        let interviewer = connect(&f, 2, Role::Interviewer).await;

        let outcome = f.usecase.execute(&interviewer).await.unwrap();

        assert_eq!(outcome.connection.user, UserId::new(2));
        assert_eq!(outcome.notify_targets, vec![candidate]);
        assert_eq!(outcome.remaining, 1);
        assert_eq!(f.presence.total_connections().await, 1);
    }

    #[tokio::test]
    async fn departure_is_reflected_in_the_durable_record() {
        let f = fixture().await;
        let interviewer = connect(&f, 2, Role::Interviewer).await;

        f.usecase.execute(&interviewer).await.unwrap();

        let record = f
            .store
            .get_participant(&code("R1"), UserId::new(2))
            .await
            .unwrap()
            .unwrap();
        assert!(!record.is_active);
        assert_eq!(record.left_at, Some(Timestamp::new(99_000)));
    }

    #[tokio::test]
    async fn leave_is_idempotent() {
        let f = fixture().await;
        let interviewer = connect(&f, 2, Role::Interviewer).await;

        assert!(f.usecase.execute(&interviewer).await.is_some());
        assert!(f.usecase.execute(&interviewer).await.is_none());
        assert!(f.usecase.execute(&ConnectionId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn last_leaver_sees_an_empty_room() {
        let f = fixture().await;
        let candidate = connect(&f, 1, Role::Candidate).await;

        let outcome = f.usecase.execute(&candidate).await.unwrap();

        assert!(outcome.notify_targets.is_empty());
        assert_eq!(outcome.remaining, 0);
        assert_eq!(f.presence.connection_count(&code("R1")).await, 0);
    }
}
