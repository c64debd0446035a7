//! Participant-notification collaborator interface.
//!
//! Scheduling, rescheduling, cancellation and deletion all notify the
//! affected users; how the notification reaches them (in-app, email) is
//! the surrounding platform's concern.

use async_trait::async_trait;

use super::value_object::UserId;

/// Out-of-band notification channel to platform users. Best-effort: the
/// coordinator never fails an operation because a notification could not
/// be delivered.
#[async_trait]
pub trait ParticipantNotifier: Send + Sync {
    async fn notify(&self, user: UserId, subject: &str, body: &str);
}
