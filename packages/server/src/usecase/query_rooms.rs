//! UseCases: room listing and room detail for the admin surface.

use std::sync::Arc;

use crate::domain::{ParticipantRecord, Room, RoomCode, RoomStatus, RoomStore};
use crate::infrastructure::presence::PresenceTracker;

use super::error::RoomQueryError;

pub struct ListRoomsUseCase {
    store: Arc<dyn RoomStore>,
}

impl ListRoomsUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// All rooms, optionally filtered by a status string (`"scheduled"`,
    /// `"active"`, `"completed"`, `"cancelled"`).
    pub async fn execute(&self, status: Option<&str>) -> Result<Vec<Room>, RoomQueryError> {
        let filter = match status {
            Some(raw) => Some(
                raw.parse::<RoomStatus>()
                    .map_err(|_| RoomQueryError::InvalidStatusFilter(raw.to_string()))?,
            ),
            None => None,
        };
        Ok(self.store.list_rooms(filter).await?)
    }
}

/// A room together with its durable participants and live-presence count.
#[derive(Debug)]
pub struct RoomDetail {
    pub room: Room,
    pub participants: Vec<ParticipantRecord>,
    pub live_connections: usize,
}

pub struct GetRoomDetailUseCase {
    store: Arc<dyn RoomStore>,
    presence: Arc<PresenceTracker>,
}

impl GetRoomDetailUseCase {
    pub fn new(store: Arc<dyn RoomStore>, presence: Arc<PresenceTracker>) -> Self {
        Self { store, presence }
    }

    pub async fn execute(&self, code: &RoomCode) -> Result<RoomDetail, RoomQueryError> {
        let room = self
            .store
            .get_room(code)
            .await?
            .ok_or(RoomQueryError::RoomNotFound)?;
        let participants = self.store.participants(code).await?;
        let live_connections = self.presence.connection_count(code).await;
        Ok(RoomDetail {
            room,
            participants,
            live_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationId, ConnectionId, Role, Timestamp, UserId};
    use crate::infrastructure::presence::LiveConnection;
    use crate::infrastructure::repository::InMemoryRoomStore;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    fn room_with_status(value: &str, status: RoomStatus) -> Room {
        Room {
            code: code(value),
            label: "Interview".to_string(),
            application: ApplicationId::new(1),
            scheduled_time: Timestamp::new(1_000),
            duration_minutes: 60,
            status,
            created_by: UserId::new(9),
            created_at: Timestamp::new(500),
            started_at: None,
            ended_at: None,
        }
    }

    #[tokio::test]
    async fn list_filters_by_parsed_status() {
        let store = Arc::new(InMemoryRoomStore::new());
        store
            .create_room(room_with_status("R1", RoomStatus::Scheduled), Vec::new())
            .await
            .unwrap();
        store
            .create_room(room_with_status("R2", RoomStatus::Cancelled), Vec::new())
            .await
            .unwrap();
        let usecase = ListRoomsUseCase::new(store);

        assert_eq!(usecase.execute(None).await.unwrap().len(), 2);
        assert_eq!(usecase.execute(Some("cancelled")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected() {
        let store = Arc::new(InMemoryRoomStore::new());
        let usecase = ListRoomsUseCase::new(store);

        let err = usecase.execute(Some("archived")).await.unwrap_err();

        assert_eq!(
            err,
            RoomQueryError::InvalidStatusFilter("archived".to_string())
        );
    }

    #[tokio::test]
    async fn detail_combines_store_rows_with_live_presence() {
        let store = Arc::new(InMemoryRoomStore::new());
        store
            .create_room(
                room_with_status("R1", RoomStatus::Scheduled),
                vec![ParticipantRecord::new(
                    code("R1"),
                    UserId::new(1),
                    Role::Candidate,
                )],
            )
            .await
            .unwrap();
        let presence = Arc::new(PresenceTracker::new());
        presence
            .register(LiveConnection {
                id: ConnectionId::generate(),
                room: code("R1"),
                user: UserId::new(1),
                role: Role::Candidate,
                connected_at: Timestamp::new(1),
            })
            .await;
        let usecase = GetRoomDetailUseCase::new(store, presence);

        let detail = usecase.execute(&code("R1")).await.unwrap();

        assert_eq!(detail.participants.len(), 1);
        assert_eq!(detail.live_connections, 1);
    }

    #[tokio::test]
    async fn unknown_room_is_reported() {
        let store = Arc::new(InMemoryRoomStore::new());
        let presence = Arc::new(PresenceTracker::new());
        let usecase = GetRoomDetailUseCase::new(store, presence);

        let err = usecase.execute(&code("missing")).await.unwrap_err();

        assert_eq!(err, RoomQueryError::RoomNotFound);
    }
}
