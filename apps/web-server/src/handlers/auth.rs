//! Registration, login, and logout.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::{Role, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PasswordService, SessionService, UserRepository};
use quill_shared::forms::{LoginForm, RegisterForm};

use super::{html_page, page_context};
use crate::flash;
use crate::middleware::auth::{MaybeUser, clear_session_cookie, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const ALREADY_REGISTERED: &str = "We already have this address on file, please log in.";
const UNKNOWN_USER: &str = "Unknown user";
const INVALID_PASSWORD: &str = "Invalid password";

/// 303 to `location` with a fresh session cookie.
fn login_redirect(token: String, location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(token))
        .finish()
}

/// GET /register
pub async fn register_form(
    state: web::Data<AppState>,
    user: MaybeUser,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let notice = flash::peek(&req);
    let ctx = page_context(user.0.as_ref(), notice.as_deref());

    html_page(&state, "register.html", ctx, notice.is_some())
}

/// POST /register - create the account and log it straight in.
///
/// The very first account registered becomes the blog's administrator.
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if let Err(msg) = form.validate() {
        return Ok(flash::redirect_with_notice("/register", &msg));
    }

    if state.users.find_by_email(&form.email).await?.is_some() {
        return Ok(flash::redirect_with_notice("/login", ALREADY_REGISTERED));
    }

    let password_hash = state.passwords.hash(&form.password)?;
    let role = if state.users.count().await? == 0 {
        Role::Admin
    } else {
        Role::Reader
    };

    let user = User::new(form.email, password_hash, form.name, role);
    let user = match state.users.insert(user).await {
        Ok(user) => user,
        // Lost the race against a concurrent registration of the same
        // address; same outcome as the check above.
        Err(RepoError::Constraint(_)) => {
            return Ok(flash::redirect_with_notice("/login", ALREADY_REGISTERED));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user = %user.id, role = user.role.as_str(), "Registered new user");

    let token = state.sessions.issue(&user)?;
    Ok(login_redirect(token, "/"))
}

/// GET /login
pub async fn login_form(
    state: web::Data<AppState>,
    user: MaybeUser,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let notice = flash::peek(&req);
    let ctx = page_context(user.0.as_ref(), notice.as_deref());

    html_page(&state, "login.html", ctx, notice.is_some())
}

/// POST /login - verify the credential and establish a session.
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let Some(user) = state.users.find_by_email(&form.email).await? else {
        return Ok(flash::redirect_with_notice("/login", UNKNOWN_USER));
    };

    if !state.passwords.verify(&form.password, &user.password_hash)? {
        return Ok(flash::redirect_with_notice("/login", INVALID_PASSWORD));
    }

    let token = state.sessions.issue(&user)?;
    Ok(login_redirect(token, "/"))
}

/// GET /logout - clear the session cookie and return to the listing.
pub async fn logout(_user: MaybeUser) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(clear_session_cookie())
        .finish()
}
