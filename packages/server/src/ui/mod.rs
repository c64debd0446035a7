//! Coordination server over Axum: HTTP admin surface plus the live
//! WebSocket room protocol.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
