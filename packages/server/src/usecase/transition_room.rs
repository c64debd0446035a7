//! UseCase: drive the room status machine.
//!
//! Validates the requested edge against the state machine, persists the
//! new status with its `started_at`/`ended_at` stamps, and notifies
//! participants of cancellations. A failing durable write surfaces to the
//! caller and leaves nothing half-applied: the status lives only in the
//! store, so an error means the room is unchanged.

use std::sync::Arc;

use greenroom_shared::time::Clock;

use crate::domain::{
    ParticipantNotifier, Room, RoomCode, RoomStatus, RoomStore, Timestamp, TransitionViolation,
    UserId,
};

use super::error::TransitionError;

pub struct TransitionRoomUseCase {
    store: Arc<dyn RoomStore>,
    notifier: Arc<dyn ParticipantNotifier>,
    clock: Arc<dyn Clock>,
}

impl TransitionRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        notifier: Arc<dyn ParticipantNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    pub async fn execute(
        &self,
        code: &RoomCode,
        target: RoomStatus,
        actor: UserId,
    ) -> Result<Room, TransitionError> {
        let mut room = self
            .store
            .get_room(code)
            .await?
            .ok_or(TransitionError::RoomNotFound)?;
        let from = room.status;

        let now = Timestamp::new(self.clock.now_utc_millis());
        room.transition(target, now).map_err(|violation| match violation {
            TransitionViolation::CompletedRoomProtected => TransitionError::CompletedRoomProtected,
            TransitionViolation::IllegalEdge { from, to } => {
                TransitionError::InvalidTransition { from, to }
            }
        })?;

        let updated = self
            .store
            .set_room_status(code, room.status, room.started_at, room.ended_at)
            .await?;
        tracing::info!(
            "Room '{}' transitioned {} -> {} by user {}",
            code,
            from.as_str(),
            target.as_str(),
            actor
        );

        if target == RoomStatus::Cancelled {
            for participant in self.store.participants(code).await? {
                self.notifier
                    .notify(
                        participant.user,
                        "Interview cancelled",
                        &format!("The interview in room {code} has been cancelled"),
                    )
                    .await;
            }
        }

        Ok(updated)
    }
}
