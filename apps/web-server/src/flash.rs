//! Flash notices: one-time messages surfaced on the next rendered page.
//!
//! The notice rides a short-lived cookie across the redirect; the page that
//! renders it clears the cookie in the same response.

use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

pub const FLASH_COOKIE: &str = "flash";

/// Read the pending notice, if any. The caller clears it when rendering.
pub fn peek(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    if cookie.value().is_empty() {
        return None;
    }
    urlencoding::decode(cookie.value())
        .ok()
        .map(|v| v.into_owned())
}

/// Cookie that erases a consumed notice.
pub fn clear_cookie() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .max_age(Duration::ZERO)
        .finish()
}

/// 303 redirect with no notice.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 303 redirect carrying a notice for the next page.
pub fn redirect_with_notice(location: &str, message: &str) -> HttpResponse {
    let cookie = Cookie::build(FLASH_COOKIE, urlencoding::encode(message).into_owned())
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}
