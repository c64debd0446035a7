//! UseCase: delete a scheduled or cancelled interview room.
//!
//! Deletion is a policy operation, not live traffic: it is refused for
//! completed rooms, cascades to participant and feedback rows, gets
//! logged, and notifies every affected participant.

use std::sync::Arc;

use crate::domain::{ParticipantNotifier, RoomCode, RoomStatus, RoomStore, UserId};

use super::error::DeleteError;

pub struct DeleteRoomUseCase {
    store: Arc<dyn RoomStore>,
    notifier: Arc<dyn ParticipantNotifier>,
}

impl DeleteRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, notifier: Arc<dyn ParticipantNotifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn execute(&self, code: &RoomCode, actor: UserId) -> Result<(), DeleteError> {
        let room = self
            .store
            .get_room(code)
            .await?
            .ok_or(DeleteError::RoomNotFound)?;
        if room.status == RoomStatus::Completed {
            return Err(DeleteError::CompletedRoomProtected);
        }

        let removed = self.store.delete_room(code).await?;
        tracing::info!(
            "Room '{}' deleted by user {} ({} participant record(s) removed)",
            code,
            actor,
            removed.len()
        );

        for participant in removed {
            self.notifier
                .notify(
                    participant.user,
                    "Interview cancelled",
                    &format!("The interview scheduled in room {code} has been cancelled"),
                )
                .await;
        }

        Ok(())
    }
}
