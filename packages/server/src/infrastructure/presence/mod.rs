//! Live-presence tracking for connected interview participants.

mod tracker;

pub use tracker::{LiveConnection, PeerSnapshot, PresenceTracker};
