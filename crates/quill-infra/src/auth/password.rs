//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use quill_core::ports::{AuthError, PasswordService};

/// Argon2-backed credential store. Salting is handled by the hashing
/// primitive itself; the stored string embeds algorithm, salt, and digest.
#[derive(Default)]
pub struct Argon2Passwords;

impl Argon2Passwords {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordService for Argon2Passwords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
