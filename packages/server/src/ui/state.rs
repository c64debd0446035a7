//! Server state and runtime configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::IdentityProvider;
use crate::infrastructure::document::DocumentStore;
use crate::infrastructure::presence::PresenceTracker;
use crate::usecase::{
    DeleteRoomUseCase, GetRoomDetailUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
    RelaySignalUseCase, RescheduleRoomUseCase, ScheduleRoomUseCase, SubmitFeedbackUseCase,
    TransitionRoomUseCase, UpdateDocumentUseCase,
};

/// Knobs the binary exposes; everything has a sensible default.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long a room may sit empty before its in-memory document
    /// snapshot is discarded.
    pub snapshot_grace: Duration,
    /// Per-connection outbound queue capacity.
    pub outbound_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            snapshot_grace: Duration::from_secs(60),
            outbound_capacity: crate::domain::pusher::DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub schedule_room: Arc<ScheduleRoomUseCase>,
    pub reschedule_room: Arc<RescheduleRoomUseCase>,
    pub transition_room: Arc<TransitionRoomUseCase>,
    pub delete_room: Arc<DeleteRoomUseCase>,
    pub join_room: Arc<JoinRoomUseCase>,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub relay_signal: Arc<RelaySignalUseCase>,
    pub update_document: Arc<UpdateDocumentUseCase>,
    pub submit_feedback: Arc<SubmitFeedbackUseCase>,
    pub list_rooms: Arc<ListRoomsUseCase>,
    pub room_detail: Arc<GetRoomDetailUseCase>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Held directly for the snapshot-discard timer the leave path spawns.
    pub documents: Arc<DocumentStore>,
    pub presence: Arc<PresenceTracker>,
    pub config: CoordinatorConfig,
}
