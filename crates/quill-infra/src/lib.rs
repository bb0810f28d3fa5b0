//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! the SeaORM-backed store, Argon2 password hashing, JWT session tokens,
//! Tera template rendering, and Gravatar avatar URLs.

pub mod auth;
pub mod avatar;
pub mod database;
pub mod render;

pub use auth::{Argon2Passwords, JwtSessions, SessionConfig};
pub use avatar::Gravatar;
pub use database::{DatabaseConfig, SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmUserRepository};
pub use render::TeraRenderer;
