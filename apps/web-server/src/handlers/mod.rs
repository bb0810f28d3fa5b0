//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod pages;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value, json};

use quill_core::ports::TemplateRenderer;

use crate::flash;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public pages
        .route("/", web::get().to(posts::index))
        .route("/post/{id}", web::get().to(posts::show))
        .route("/about", web::get().to(pages::about))
        .route("/contact", web::get().to(pages::contact))
        .route("/health", web::get().to(health::health_check))
        // Account routes
        .route("/register", web::get().to(auth::register_form))
        .route("/register", web::post().to(auth::register))
        .route("/login", web::get().to(auth::login_form))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::get().to(auth::logout))
        // Commenting (login required)
        .route("/post/{id}", web::post().to(comments::add_comment))
        // Post management (admin only)
        .route("/new-post", web::get().to(posts::new_form))
        .route("/new-post", web::post().to(posts::create))
        .route("/edit-post/{id}", web::get().to(posts::edit_form))
        .route("/edit-post/{id}", web::post().to(posts::update))
        .route("/delete/{id}", web::post().to(posts::delete));
}

/// Context keys every page shares: the signed-in user (for the nav) and the
/// pending flash notice.
pub(crate) fn page_context(user: Option<&CurrentUser>, notice: Option<&str>) -> Map<String, Value> {
    let mut ctx = Map::new();

    ctx.insert(
        "current_user".to_string(),
        match user {
            Some(u) => json!({ "name": u.name, "is_admin": u.is_admin() }),
            None => Value::Null,
        },
    );
    ctx.insert(
        "notice".to_string(),
        notice.map(|n| Value::String(n.to_string())).unwrap_or(Value::Null),
    );

    ctx
}

/// Render a view and clear the flash notice it just displayed.
pub(crate) fn html_page(
    state: &AppState,
    view: &str,
    ctx: Map<String, Value>,
    clear_notice: bool,
) -> AppResult<HttpResponse> {
    let html = state.renderer.render(view, &Value::Object(ctx))?;

    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if clear_notice {
        builder.cookie(flash::clear_cookie());
    }

    Ok(builder.body(html))
}
