//! Static pages.

use actix_web::{HttpRequest, HttpResponse, web};

use super::{html_page, page_context};
use crate::flash;
use crate::middleware::auth::MaybeUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /about
pub async fn about(
    state: web::Data<AppState>,
    user: MaybeUser,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let notice = flash::peek(&req);
    let ctx = page_context(user.0.as_ref(), notice.as_deref());

    html_page(&state, "about.html", ctx, notice.is_some())
}

/// GET /contact
pub async fn contact(
    state: web::Data<AppState>,
    user: MaybeUser,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let notice = flash::peek(&req);
    let ctx = page_context(user.0.as_ref(), notice.as_deref());

    html_page(&state, "contact.html", ctx, notice.is_some())
}
