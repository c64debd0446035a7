//! Use case layer: one use case per coordinator operation.
//!
//! Lifecycle controller: schedule / reschedule / transition / delete.
//! Live room: join / leave / relay_signal / update_document.
//! Supporting: submit_feedback, query_rooms.

pub mod delete_room;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod query_rooms;
pub mod relay_signal;
pub mod reschedule_room;
pub mod schedule_room;
pub mod submit_feedback;
pub mod transition_room;
pub mod update_document;

pub use delete_room::DeleteRoomUseCase;
pub use error::{
    DeleteError, DocumentError, FeedbackError, JoinError, RescheduleError, RoomQueryError,
    ScheduleError, TransitionError,
};
pub use join_room::{JoinAuthorization, JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use query_rooms::{GetRoomDetailUseCase, ListRoomsUseCase, RoomDetail};
pub use relay_signal::{RelayDisposition, RelaySignalUseCase};
pub use reschedule_room::{RescheduleRequest, RescheduleRoomUseCase};
pub use schedule_room::{ScheduleRequest, ScheduleRoomUseCase};
pub use submit_feedback::{FeedbackForm, SubmitFeedbackUseCase};
pub use transition_room::TransitionRoomUseCase;
pub use update_document::UpdateDocumentUseCase;
