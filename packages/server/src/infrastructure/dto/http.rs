//! HTTP API payloads for the scheduling/admin surface.

use serde::{Deserialize, Serialize};

use crate::domain::{FeedbackRating, HireRecommendation, RoomStatus};

#[derive(Debug, Deserialize)]
pub struct ScheduleRoomRequest {
    pub application_id: i64,
    /// RFC 3339, or the `YYYY-MM-DDTHH:MM` datetime-local form.
    pub scheduled_time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub label: Option<String>,
    pub candidate_id: i64,
    #[serde(default)]
    pub interviewer_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRoomRequest {
    pub scheduled_time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub interviewer_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: RoomStatus,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackSubmission {
    pub technical_score: u8,
    pub communication_score: u8,
    pub problem_solving_score: u8,
    pub overall_rating: FeedbackRating,
    #[serde(default)]
    pub notes: String,
    pub recommendation: HireRecommendation,
}

#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub code: String,
    pub label: String,
    pub application_id: i64,
    pub scheduled_time: String,
    pub duration_minutes: u32,
    pub status: RoomStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub user_id: i64,
    pub role: crate::domain::Role,
    pub joined_at: Option<String>,
    pub left_at: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub code: String,
    pub label: String,
    pub application_id: i64,
    pub scheduled_time: String,
    pub duration_minutes: u32,
    pub status: RoomStatus,
    pub created_by: i64,
    pub created_at: String,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub participants: Vec<ParticipantDto>,
    /// Connections currently live in this room's group.
    pub live_connections: usize,
}
