//! UseCase: schedule an interview room.
//!
//! Creates the durable Room in `scheduled` status together with its
//! initial participant set — exactly one candidate plus the invited
//! interviewers — and notifies everyone involved.

use std::sync::Arc;

use greenroom_shared::time::{Clock, parse_schedule_time};

use crate::domain::{
    ApplicationId, ParticipantNotifier, ParticipantRecord, Role, Room, RoomCode, RoomStatus,
    RoomStore, Timestamp, UserId,
};

use super::error::ScheduleError;

const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub application: ApplicationId,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM`; anything else is a validation error.
    pub scheduled_time: String,
    pub duration_minutes: Option<u32>,
    pub label: Option<String>,
    pub created_by: UserId,
    pub candidate: UserId,
    pub interviewers: Vec<UserId>,
}

pub struct ScheduleRoomUseCase {
    store: Arc<dyn RoomStore>,
    notifier: Arc<dyn ParticipantNotifier>,
    clock: Arc<dyn Clock>,
}

impl ScheduleRoomUseCase {
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

    pub async fn execute(&self, request: ScheduleRequest) -> Result<Room, ScheduleError> {
        let scheduled_time = parse_schedule_time(&request.scheduled_time)
            .map(Timestamp::new)
            .ok_or_else(|| ScheduleError::InvalidScheduledTime(request.scheduled_time.clone()))?;

        let now = Timestamp::new(self.clock.now_utc_millis());
        let code = RoomCode::for_application(request.application, now);
        let label = request
            .label
            .clone()
            .unwrap_or_else(|| format!("Interview - application {}", request.application.value()));

        let room = Room {
            code: code.clone(),
            label,
            application: request.application,
            scheduled_time,
            duration_minutes: request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: RoomStatus::Scheduled,
            created_by: request.created_by,
            created_at: now,
            started_at: None,
            ended_at: None,
        };

        let interviewers = dedup_interviewers(&request.interviewers, request.candidate);
        let mut participants = vec![ParticipantRecord::new(
            code.clone(),
            request.candidate,
            Role::Candidate,
        )];
        for interviewer in &interviewers {
            participants.push(ParticipantRecord::new(
                code.clone(),
                *interviewer,
                Role::Interviewer,
            ));
        }

        self.store.create_room(room.clone(), participants).await?;
        tracing::info!(
            "Scheduled room '{}' for application {} with {} interviewer(s)",
            code,
            request.application.value(),
            interviewers.len()
        );

        let when = scheduled_time.to_rfc3339();
        self.notifier
            .notify(
                request.candidate,
                "Interview scheduled",
                &format!("Your interview has been scheduled for {when} (room {code})"),
            )
            .await;
        for interviewer in interviewers {
            self.notifier
                .notify(
                    interviewer,
                    "Interview assignment",
                    &format!("You have been assigned to an interview on {when} (room {code})"),
                )
                .await;
        }

        Ok(room)
    }
}

/// Keep the interviewer list free of duplicates and of the candidate
/// itself, so the one-candidate-per-room invariant holds.
fn dedup_interviewers(interviewers: &[UserId], candidate: UserId) -> Vec<UserId> {
    let mut seen = Vec::new();
    for user in interviewers {
        if *user != candidate && !seen.contains(user) {
            seen.push(*user);
        }
    }
    seen
}
