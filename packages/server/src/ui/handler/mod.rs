//! HTTP and WebSocket request handlers.

mod http;
mod websocket;

pub use http::{
    delete_room, get_room_detail, get_rooms, health_check, reschedule_room, schedule_room,
    submit_feedback, transition_room,
};
pub use websocket::websocket_handler;
