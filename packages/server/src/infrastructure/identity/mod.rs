//! Identity provider implementations.

mod jwt;

pub use jwt::JwtIdentityProvider;
