//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::error::RepoError;
use quill_core::ports::{
    AvatarProvider, CommentRepository, PasswordService, PostRepository, RenderError,
    SessionService, TemplateRenderer, UserRepository,
};
use quill_infra::database::{
    DatabaseConfig, SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmUserRepository, connect,
};
use quill_infra::{Argon2Passwords, Gravatar, JwtSessions, TeraRenderer};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub passwords: Arc<dyn PasswordService>,
    pub sessions: Arc<dyn SessionService>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub avatars: Arc<dyn AvatarProvider>,
}

/// Failures that prevent the application from starting.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("database: {0}")]
    Database(#[from] RepoError),

    #[error("templates: {0}")]
    Templates(#[from] RenderError),
}

impl AppState {
    /// Connect the store and wire every port to its implementation.
    pub async fn new(config: &AppConfig, db_config: &DatabaseConfig) -> Result<Self, StateInitError> {
        let conn = connect(db_config).await?;

        let state = Self {
            users: Arc::new(SeaOrmUserRepository::new(conn.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(conn.clone())),
            comments: Arc::new(SeaOrmCommentRepository::new(conn)),
            passwords: Arc::new(Argon2Passwords::new()),
            sessions: Arc::new(JwtSessions::new(config.session.clone())),
            renderer: Arc::new(TeraRenderer::from_glob(&config.template_glob)?),
            avatars: Arc::new(Gravatar::default()),
        };

        tracing::info!("Application state initialized");

        Ok(state)
    }
}
