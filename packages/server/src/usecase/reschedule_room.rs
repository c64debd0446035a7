//! UseCase: reschedule an interview room.
//!
//! Updates the scheduled time and duration and replaces the interviewer
//! set; the candidate is retained and the room's status is left alone.
//! Terminal rooms cannot be rescheduled.

use std::sync::Arc;

use greenroom_shared::time::parse_schedule_time;

use crate::domain::{ParticipantNotifier, Room, RoomCode, RoomStore, Timestamp, UserId};

use super::error::RescheduleError;

#[derive(Debug, Clone)]
pub struct RescheduleRequest {
    pub scheduled_time: String,
    pub duration_minutes: Option<u32>,
    pub interviewers: Vec<UserId>,
}

pub struct RescheduleRoomUseCase {
    store: Arc<dyn RoomStore>,
    notifier: Arc<dyn ParticipantNotifier>,
}

impl RescheduleRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, notifier: Arc<dyn ParticipantNotifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn execute(
        &self,
        code: &RoomCode,
        request: RescheduleRequest,
    ) -> Result<Room, RescheduleError> {
        let scheduled_time = parse_schedule_time(&request.scheduled_time)
            .map(Timestamp::new)
            .ok_or_else(|| RescheduleError::InvalidScheduledTime(request.scheduled_time.clone()))?;

        let room = self
            .store
            .get_room(code)
            .await?
            .ok_or(RescheduleError::RoomNotFound)?;
        if room.status.is_terminal() {
            return Err(RescheduleError::InvalidTransition { from: room.status });
        }

        let duration = request.duration_minutes.unwrap_or(room.duration_minutes);
        let updated = self.store.set_schedule(code, scheduled_time, duration).await?;
        self.store
            .replace_interviewers(code, request.interviewers.clone())
            .await?;
        tracing::info!(
            "Rescheduled room '{}' to {} with {} interviewer(s)",
            code,
            scheduled_time.to_rfc3339(),
            request.interviewers.len()
        );

        let when = scheduled_time.to_rfc3339();
        for participant in self.store.participants(code).await? {
            self.notifier
                .notify(
                    participant.user,
                    "Interview updated",
                    &format!("Your interview in room {code} has been rescheduled to {when}"),
                )
                .await;
        }

        Ok(updated)
    }
}
