//! UseCase: record interview feedback.
//!
//! Only identities holding an interviewer participant record for the room
//! may submit; the candidate is resolved from the room's participant set
//! and the entry is validated before it reaches the store.

use std::sync::Arc;

use greenroom_shared::time::Clock;

use crate::domain::{
    FeedbackEntry, FeedbackRating, HireRecommendation, Role, RoomCode, RoomStore, Timestamp,
    UserId,
};

use super::error::FeedbackError;

#[derive(Debug, Clone)]
pub struct FeedbackForm {
    pub technical_score: u8,
    pub communication_score: u8,
    pub problem_solving_score: u8,
    pub overall_rating: FeedbackRating,
    pub notes: String,
    pub recommendation: HireRecommendation,
}

pub struct SubmitFeedbackUseCase {
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
}

impl SubmitFeedbackUseCase {
    pub fn new(store: Arc<dyn RoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        code: &RoomCode,
        interviewer: UserId,
        form: FeedbackForm,
    ) -> Result<(), FeedbackError> {
        self.store
            .get_room(code)
            .await?
            .ok_or(FeedbackError::RoomNotFound)?;

        let submitter = self
            .store
            .get_participant(code, interviewer)
            .await?
            .ok_or(FeedbackError::NotAnInterviewer)?;
        if submitter.role != Role::Interviewer {
            return Err(FeedbackError::NotAnInterviewer);
        }

        let candidate = self
            .store
            .participants(code)
            .await?
            .into_iter()
            .find(|p| p.role == Role::Candidate)
            .ok_or(FeedbackError::MissingCandidate)?;

        let entry = FeedbackEntry::new(
            code.clone(),
            interviewer,
            candidate.user,
            form.technical_score,
            form.communication_score,
            form.problem_solving_score,
            form.overall_rating,
            form.notes,
            form.recommendation,
            Timestamp::new(self.clock.now_utc_millis()),
        )?;
        self.store.add_feedback(entry).await?;
        tracing::info!("Feedback recorded for room '{}' by user {}", code, interviewer);
        Ok(())
    }
}
