//! Live interview-room coordination server.
//!
//! This library implements the real-time coordinator of a recruitment
//! platform: the interview-room lifecycle state machine, the live-presence
//! tracker, the WebRTC signaling relay between peers, and the shared code
//! editor broadcast. Durable storage, identity issuance and participant
//! notification are consumed through traits and stay external.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
