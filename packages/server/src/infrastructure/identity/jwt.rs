//! JWT-backed identity verification.
//!
//! The platform's session layer issues HS256 tokens; the coordinator only
//! verifies them and reads out the subject. Token issuance here (`issue`)
//! exists for the development binary and the test suite.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Identity, IdentityProvider, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default = "default_verified")]
    verified: bool,
}

fn default_verified() -> bool {
    true
}

pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a token for `user`, valid for `ttl_secs` from now.
    pub fn issue(&self, user: UserId, ttl_secs: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.value().to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
            verified: true,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Sign a token whose `verified` claim is false. Test support for the
    /// unverified-identity rejection path.
    pub fn issue_unverified(
        &self,
        user: UserId,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.value().to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
            verified: false,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn current_identity(&self, token: &str) -> Option<Identity> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .ok()?;
        let user_id = data.claims.sub.parse::<i64>().ok()?;
        Some(Identity {
            user_id: UserId::new(user_id),
            verified: data.claims.verified,
        })
    }
}
