//! Authentication ports: password hashing and the session/identity provider.

use uuid::Uuid;

use crate::domain::{Role, User};

/// Identity carried by a valid session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

/// Session service: turns a logged-in user into an opaque token and back.
///
/// An invalid or expired token is a rejection, never a panic; callers treat
/// rejections as "anonymous".
pub trait SessionService: Send + Sync {
    /// Issue a signed session token for a user who just authenticated.
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Validate a token and recover the identity it was issued for.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash. A mismatch is `Ok(false)`, not an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}
