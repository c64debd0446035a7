//! Verified-identity collaborator interface.
//!
//! Session issuance lives in the surrounding platform; the coordinator
//! only resolves an opaque token into a user id plus a verification flag.

use super::value_object::UserId;

/// The identity a token resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub verified: bool,
}

/// Resolves opaque session tokens. Implemented by the infrastructure layer.
pub trait IdentityProvider: Send + Sync {
    /// Resolve a token into an identity, or `None` when the token is
    /// invalid, expired or malformed.
    fn current_identity(&self, token: &str) -> Option<Identity>;
}
