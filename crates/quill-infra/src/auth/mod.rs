//! Authentication implementations.

mod password;
mod session;

pub use password::Argon2Passwords;
pub use session::{JwtSessions, SessionConfig};
