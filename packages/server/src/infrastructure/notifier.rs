//! Logging stand-in for the platform's notification service.
//!
//! The real deployment routes these through the platform's in-app
//! notification tables; inside the coordinator they only need to be
//! observable.

use async_trait::async_trait;

use crate::domain::{ParticipantNotifier, UserId};

#[derive(Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ParticipantNotifier for LogNotifier {
    async fn notify(&self, user: UserId, subject: &str, body: &str) {
        tracing::info!("Notification for user {}: {} - {}", user, subject, body);
    }
}
