//! HTTP API endpoint handlers for the scheduling/admin surface.
//!
//! Mutating endpoints authenticate through a bearer token resolved by the
//! identity collaborator; the resulting user id is the acting user for
//! logging and policy checks.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};

use crate::domain::{ApplicationId, Identity, RoomCode, UserId};
use crate::infrastructure::dto::conversion::room_detail_dto;
use crate::infrastructure::dto::http::{
    FeedbackSubmission, RescheduleRoomRequest, RoomDetailDto, RoomSummaryDto, RoomsQuery,
    ScheduleRoomRequest, TransitionRequest,
};
use crate::usecase::{
    DeleteError, FeedbackError, RescheduleError, RescheduleRequest, RoomQueryError, ScheduleError,
    ScheduleRequest, TransitionError,
};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn bearer_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let identity = state
        .identity
        .current_identity(token)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if !identity.verified {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(identity)
}

fn parse_code(raw: String) -> Result<RoomCode, StatusCode> {
    RoomCode::new(raw).map_err(|_| StatusCode::BAD_REQUEST)
}

/// Get list of rooms, optionally filtered by status
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    match state.list_rooms.execute(query.status.as_deref()).await {
        Ok(rooms) => Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect())),
        Err(RoomQueryError::InvalidStatusFilter(_)) => Err(StatusCode::BAD_REQUEST),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Get room detail by code, including live-presence count
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let code = parse_code(code)?;
    match state.room_detail.execute(&code).await {
        Ok(detail) => Ok(Json(room_detail_dto(
            &detail.room,
            &detail.participants,
            detail.live_connections,
        ))),
        Err(RoomQueryError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Schedule a new interview room
pub async fn schedule_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ScheduleRoomRequest>,
) -> Result<(StatusCode, Json<RoomSummaryDto>), StatusCode> {
    let identity = bearer_identity(&state, &headers)?;
    let result = state
        .schedule_room
        .execute(ScheduleRequest {
            application: ApplicationId::new(request.application_id),
            scheduled_time: request.scheduled_time,
            duration_minutes: request.duration_minutes,
            label: request.label,
            created_by: identity.user_id,
            candidate: UserId::new(request.candidate_id),
            interviewers: request.interviewer_ids.into_iter().map(UserId::new).collect(),
        })
        .await;
    match result {
        Ok(room) => Ok((StatusCode::CREATED, Json(RoomSummaryDto::from(&room)))),
        Err(ScheduleError::InvalidScheduledTime(_)) => Err(StatusCode::BAD_REQUEST),
        Err(ScheduleError::Store(crate::domain::StoreError::DuplicateRoom(_))) => {
            Err(StatusCode::CONFLICT)
        }
        Err(ScheduleError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Reschedule an existing room (time, duration, interviewer set)
pub async fn reschedule_room(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RescheduleRoomRequest>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let _identity = bearer_identity(&state, &headers)?;
    let code = parse_code(code)?;
    let result = state
        .reschedule_room
        .execute(
            &code,
            RescheduleRequest {
                scheduled_time: request.scheduled_time,
                duration_minutes: request.duration_minutes,
                interviewers: request.interviewer_ids.into_iter().map(UserId::new).collect(),
            },
        )
        .await;
    match result {
        Ok(room) => Ok(Json(RoomSummaryDto::from(&room))),
        Err(RescheduleError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(RescheduleError::InvalidScheduledTime(_)) => Err(StatusCode::BAD_REQUEST),
        Err(RescheduleError::InvalidTransition { .. }) => Err(StatusCode::CONFLICT),
        Err(RescheduleError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Drive the room status machine
pub async fn transition_room(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let identity = bearer_identity(&state, &headers)?;
    let code = parse_code(code)?;
    let result = state
        .transition_room
        .execute(&code, request.status, identity.user_id)
        .await;
    match result {
        Ok(room) => Ok(Json(RoomSummaryDto::from(&room))),
        Err(TransitionError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(TransitionError::InvalidTransition { .. }) => Err(StatusCode::CONFLICT),
        Err(TransitionError::CompletedRoomProtected) => Err(StatusCode::FORBIDDEN),
        Err(TransitionError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Delete a non-completed room, cascading to participants and feedback
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let identity = bearer_identity(&state, &headers)?;
    let code = parse_code(code)?;
    match state.delete_room.execute(&code, identity.user_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DeleteError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(DeleteError::CompletedRoomProtected) => Err(StatusCode::FORBIDDEN),
        Err(DeleteError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Record interview feedback from the authenticated interviewer
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(request): Json<FeedbackSubmission>,
) -> Result<StatusCode, StatusCode> {
    let identity = bearer_identity(&state, &headers)?;
    let code = parse_code(code)?;
    let result = state
        .submit_feedback
        .execute(
            &code,
            identity.user_id,
            crate::usecase::FeedbackForm {
                technical_score: request.technical_score,
                communication_score: request.communication_score,
                problem_solving_score: request.problem_solving_score,
                overall_rating: request.overall_rating,
                notes: request.notes,
                recommendation: request.recommendation,
            },
        )
        .await;
    match result {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(FeedbackError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(FeedbackError::NotAnInterviewer) => Err(StatusCode::FORBIDDEN),
        Err(FeedbackError::Invalid(_)) => Err(StatusCode::BAD_REQUEST),
        Err(FeedbackError::MissingCandidate) | Err(FeedbackError::Store(_)) => {
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
