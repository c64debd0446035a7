//! Infrastructure layer: concrete implementations of the domain seams and
//! the process-local state the coordinator owns (presence, documents,
//! outbound delivery), plus the wire DTOs.

pub mod document;
pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod notifier;
pub mod presence;
pub mod repository;
