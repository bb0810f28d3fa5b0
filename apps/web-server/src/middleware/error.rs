//! Error handling - maps application failures onto the HTTP surface.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use quill_core::error::RepoError;
use quill_core::ports::{AuthError, RenderError};

/// Application-level error type.
///
/// Validation and credential failures never become an `AppError`; they are
/// flash notices. What lands here is the hard surface: missing rows, policy
/// denials, duplicate titles, and broken collaborators.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Forbidden,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(detail) => format!("404 Not Found: {detail}"),
            AppError::Forbidden => "403 Forbidden".to_string(),
            AppError::Conflict(detail) => format!("409 Conflict: {detail}"),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {detail}");
                "500 Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("no such record".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {msg}");
                AppError::Internal("database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {msg}");
                AppError::Internal("database error".to_string())
            }
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
