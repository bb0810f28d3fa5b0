//! Identity extractors and the admin gate.
//!
//! Identity is an explicit per-request value resolved from the session
//! cookie, never an ambient global. A missing or invalid cookie is simply
//! "anonymous".

use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use std::fmt;
use std::future::{Ready, ready};
use uuid::Uuid;

use quill_core::domain::Role;
use quill_core::ports::{SessionClaims, SessionService};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Cookie establishing a session for a freshly issued token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

/// Cookie that ends the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish()
}

/// The identity attached to the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Resolve the session cookie to an identity. Any validation failure
/// downgrades to anonymous.
fn session_user(req: &HttpRequest) -> Option<CurrentUser> {
    let state = req.app_data::<web::Data<AppState>>()?;
    let cookie = req.cookie(SESSION_COOKIE)?;

    match state.sessions.validate(cookie.value()) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!("Rejecting session cookie: {e}");
            None
        }
    }
}

/// Optional identity extractor - never fails, anonymous is `None`.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(session_user(req))))
    }
}

/// Admin gate for post management routes.
///
/// Anonymous visitors are sent back to the post listing; logged-in
/// non-admins get a hard 403. Evaluated fresh on every request.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequest for RequireAdmin {
    type Error = AccessDenied;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match session_user(req) {
            None => Err(AccessDenied::Anonymous),
            Some(user) if !user.is_admin() => Err(AccessDenied::Forbidden),
            Some(user) => Ok(RequireAdmin(user)),
        };

        ready(result)
    }
}

/// Rejection of the admin gate.
#[derive(Debug)]
pub enum AccessDenied {
    Anonymous,
    Forbidden,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDenied::Anonymous => write!(f, "authentication required"),
            AccessDenied::Forbidden => write!(f, "admin access required"),
        }
    }
}

impl ResponseError for AccessDenied {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AccessDenied::Anonymous => actix_web::http::StatusCode::SEE_OTHER,
            AccessDenied::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AccessDenied::Anonymous => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .finish(),
            AccessDenied::Forbidden => HttpResponse::Forbidden()
                .content_type("text/plain; charset=utf-8")
                .body("403 Forbidden"),
        }
    }
}
