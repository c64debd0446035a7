//! In-memory Room Store implementation.
//!
//! Implements the `RoomStore` trait the domain layer defines (dependency
//! inversion) over plain maps. The development binary and the test suite
//! run against this; a deployment backed by the platform's relational
//! database would implement the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    FeedbackEntry, ParticipantRecord, Role, Room, RoomCode, RoomStatus, RoomStore, StoreError,
    Timestamp, UserId,
};

struct RoomRecord {
    room: Room,
    participants: Vec<ParticipantRecord>,
    feedback: Vec<FeedbackEntry>,
}

/// Mutex-guarded map of room records keyed by room code.
#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomCode, RoomRecord>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feedback rows stored for a room. Test observability only.
    pub async fn feedback_count(&self, code: &RoomCode) -> usize {
        self.rooms
            .lock()
            .await
            .get(code)
            .map_or(0, |record| record.feedback.len())
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(
        &self,
        room: Room,
        participants: Vec<ParticipantRecord>,
    ) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.code) {
            return Err(StoreError::DuplicateRoom(room.code.as_str().to_string()));
        }
        rooms.insert(
            room.code.clone(),
            RoomRecord {
                room,
                participants,
                feedback: Vec::new(),
            },
        );
        Ok(())
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Option<Room>, StoreError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(code).map(|record| record.room.clone()))
    }

    async fn list_rooms(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, StoreError> {
        let rooms = self.rooms.lock().await;
        let mut listed: Vec<Room> = rooms
            .values()
            .map(|record| record.room.clone())
            .filter(|room| status.is_none_or(|wanted| room.status == wanted))
            .collect();
        listed.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));
        Ok(listed)
    }

    async fn set_room_status(
        &self,
        code: &RoomCode,
        status: RoomStatus,
        started_at: Option<Timestamp>,
        ended_at: Option<Timestamp>,
    ) -> Result<Room, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        record.room.status = status;
        if started_at.is_some() {
            record.room.started_at = started_at;
        }
        if ended_at.is_some() {
            record.room.ended_at = ended_at;
        }
        Ok(record.room.clone())
    }

    async fn set_schedule(
        &self,
        code: &RoomCode,
        scheduled_time: Timestamp,
        duration_minutes: u32,
    ) -> Result<Room, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        record.room.scheduled_time = scheduled_time;
        record.room.duration_minutes = duration_minutes;
        Ok(record.room.clone())
    }

    async fn replace_interviewers(
        &self,
        code: &RoomCode,
        interviewers: Vec<UserId>,
    ) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        record
            .participants
            .retain(|p| p.role != Role::Interviewer);
        for user in interviewers {
            record
                .participants
                .push(ParticipantRecord::new(code.clone(), user, Role::Interviewer));
        }
        Ok(())
    }

    async fn delete_room(&self, code: &RoomCode) -> Result<Vec<ParticipantRecord>, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .remove(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        // participant and feedback rows go with the room record
        Ok(record.participants)
    }

    async fn get_participant(
        &self,
        code: &RoomCode,
        user: UserId,
    ) -> Result<Option<ParticipantRecord>, StoreError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(code)
            .and_then(|record| record.participants.iter().find(|p| p.user == user))
            .cloned())
    }

    async fn participants(&self, code: &RoomCode) -> Result<Vec<ParticipantRecord>, StoreError> {
        let rooms = self.rooms.lock().await;
        let record = rooms
            .get(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        Ok(record.participants.clone())
    }

    async fn update_participant_presence(
        &self,
        code: &RoomCode,
        user: UserId,
        joined_at: Option<Timestamp>,
        left_at: Option<Timestamp>,
        is_active: bool,
    ) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.as_str().to_string()))?;
        let participant = record
            .participants
            .iter_mut()
            .find(|p| p.user == user)
            .ok_or(StoreError::ParticipantNotFound {
                room: code.as_str().to_string(),
                user: user.value(),
            })?;
        if joined_at.is_some() {
            participant.joined_at = joined_at;
        }
        if left_at.is_some() {
            participant.left_at = left_at;
        }
        participant.is_active = is_active;
        Ok(())
    }

    async fn add_feedback(&self, entry: FeedbackEntry) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let record = rooms
            .get_mut(&entry.room)
            .ok_or_else(|| StoreError::RoomNotFound(entry.room.as_str().to_string()))?;
        record.feedback.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationId;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    fn scheduled_room(value: &str) -> Room {
        Room {
            code: code(value),
            label: format!("Interview - {value}"),
            application: ApplicationId::new(7),
            scheduled_time: Timestamp::new(5_000),
            duration_minutes: 60,
            status: RoomStatus::Scheduled,
            created_by: UserId::new(99),
            created_at: Timestamp::new(1_000),
            started_at: None,
            ended_at: None,
        }
    }

    fn initial_participants(value: &str) -> Vec<ParticipantRecord> {
        vec![
            ParticipantRecord::new(code(value), UserId::new(1), Role::Candidate),
            ParticipantRecord::new(code(value), UserId::new(2), Role::Interviewer),
        ]
    }

    #[tokio::test]
    async fn created_room_is_readable_with_its_participants() {
        let store = InMemoryRoomStore::new();

        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();

        let room = store.get_room(&code("R1")).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Scheduled);
        let participants = store.participants(&code("R1")).await.unwrap();
        assert_eq!(participants.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_room_codes_are_rejected() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), Vec::new())
            .await
            .unwrap();

        let result = store.create_room(scheduled_room("R1"), Vec::new()).await;

        assert_eq!(result, Err(StoreError::DuplicateRoom("R1".to_string())));
    }

    #[tokio::test]
    async fn set_room_status_stamps_only_the_given_timestamps() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), Vec::new())
            .await
            .unwrap();

        let room = store
            .set_room_status(&code("R1"), RoomStatus::Active, Some(Timestamp::new(9)), None)
            .await
            .unwrap();

        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.started_at, Some(Timestamp::new(9)));
        assert_eq!(room.ended_at, None);
    }

    #[tokio::test]
    async fn replace_interviewers_keeps_the_candidate() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();

        store
            .replace_interviewers(&code("R1"), vec![UserId::new(5), UserId::new(6)])
            .await
            .unwrap();

        let participants = store.participants(&code("R1")).await.unwrap();
        assert_eq!(participants.len(), 3);
        assert!(
            participants
                .iter()
                .any(|p| p.user == UserId::new(1) && p.role == Role::Candidate)
        );
        assert!(!participants.iter().any(|p| p.user == UserId::new(2)));
    }

    #[tokio::test]
    async fn delete_room_cascades_and_returns_participants() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();

        let removed = store.delete_room(&code("R1")).await.unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(store.get_room(&code("R1")).await.unwrap(), None);
        assert_eq!(
            store.participants(&code("R1")).await,
            Err(StoreError::RoomNotFound("R1".to_string()))
        );
    }

    #[tokio::test]
    async fn presence_update_touches_only_named_fields() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();

        store
            .update_participant_presence(
                &code("R1"),
                UserId::new(1),
                Some(Timestamp::new(50)),
                None,
                true,
            )
            .await
            .unwrap();
        let joined = store
            .get_participant(&code("R1"), UserId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert!(joined.is_active);
        assert_eq!(joined.joined_at, Some(Timestamp::new(50)));
        assert_eq!(joined.left_at, None);

        store
            .update_participant_presence(
                &code("R1"),
                UserId::new(1),
                None,
                Some(Timestamp::new(80)),
                false,
            )
            .await
            .unwrap();
        let left = store
            .get_participant(&code("R1"), UserId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert!(!left.is_active);
        assert_eq!(left.joined_at, Some(Timestamp::new(50)));
        assert_eq!(left.left_at, Some(Timestamp::new(80)));
    }

    #[tokio::test]
    async fn presence_update_for_unknown_user_fails() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();

        let result = store
            .update_participant_presence(&code("R1"), UserId::new(42), None, None, true)
            .await;

        assert_eq!(
            result,
            Err(StoreError::ParticipantNotFound {
                room: "R1".to_string(),
                user: 42,
            })
        );
    }

    #[tokio::test]
    async fn list_rooms_filters_by_status_and_orders_newest_first() {
        let store = InMemoryRoomStore::new();
        let mut early = scheduled_room("R1");
        early.scheduled_time = Timestamp::new(1_000);
        let mut late = scheduled_room("R2");
        late.scheduled_time = Timestamp::new(2_000);
        let mut cancelled = scheduled_room("R3");
        cancelled.status = RoomStatus::Cancelled;
        store.create_room(early, Vec::new()).await.unwrap();
        store.create_room(late, Vec::new()).await.unwrap();
        store.create_room(cancelled, Vec::new()).await.unwrap();

        let all = store.list_rooms(None).await.unwrap();
        let scheduled = store.list_rooms(Some(RoomStatus::Scheduled)).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(scheduled.len(), 2);
        assert_eq!(scheduled[0].code, code("R2"));
        assert_eq!(scheduled[1].code, code("R1"));
    }

    #[tokio::test]
    async fn feedback_rows_accumulate_per_room() {
        let store = InMemoryRoomStore::new();
        store
            .create_room(scheduled_room("R1"), initial_participants("R1"))
            .await
            .unwrap();
        let entry = FeedbackEntry::new(
            code("R1"),
            UserId::new(2),
            UserId::new(1),
            8,
            7,
            9,
            crate::domain::FeedbackRating::Good,
            "solid systems knowledge".to_string(),
            crate::domain::HireRecommendation::Hire,
            Timestamp::new(100),
        )
        .unwrap();

        store.add_feedback(entry).await.unwrap();

        assert_eq!(store.feedback_count(&code("R1")).await, 1);
    }
}
