//! Post listing, reading, and admin-only management.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::ports::{AvatarProvider, BaseRepository, CommentRepository, PostRepository};
use quill_shared::forms::PostForm;

use super::{html_page, page_context};
use crate::flash;
use crate::middleware::auth::{MaybeUser, RequireAdmin};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Display format for publication dates, e.g. "August 06, 2026".
const DATE_FORMAT: &str = "%B %d, %Y";

/// GET / - every post, newest first.
pub async fn index(
    state: web::Data<AppState>,
    user: MaybeUser,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;

    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let author = state.users.find_by_id(post.author_id).await?;
        views.push(json!({
            "id": post.id,
            "title": post.title,
            "subtitle": post.subtitle,
            "published_on": post.published_on.format(DATE_FORMAT).to_string(),
            "author": author.map(|a| a.name).unwrap_or_default(),
        }));
    }

    let notice = flash::peek(&req);
    let mut ctx = page_context(user.0.as_ref(), notice.as_deref());
    ctx.insert("posts".to_string(), Value::Array(views));

    html_page(&state, "index.html", ctx, notice.is_some())
}

/// GET /post/{id} - a single post with its comments and the comment form.
pub async fn show(
    state: web::Data<AppState>,
    user: MaybeUser,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
    let author = state.users.find_by_id(post.author_id).await?;

    let comments = state.comments.find_by_post(id).await?;
    let mut comment_views = Vec::with_capacity(comments.len());
    for comment in comments {
        let commenter = state.users.find_by_id(comment.commenter_id).await?;
        comment_views.push(json!({
            "body": comment.body,
            "author": commenter.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            "avatar_url": commenter
                .map(|u| state.avatars.avatar_url(&u.email))
                .unwrap_or_default(),
        }));
    }

    let notice = flash::peek(&req);
    let mut ctx = page_context(user.0.as_ref(), notice.as_deref());
    ctx.insert(
        "post".to_string(),
        json!({
            "id": post.id,
            "title": post.title,
            "subtitle": post.subtitle,
            "body": post.body,
            "img_url": post.img_url,
            "published_on": post.published_on.format(DATE_FORMAT).to_string(),
            "author": author.map(|a| a.name).unwrap_or_default(),
        }),
    );
    ctx.insert("comments".to_string(), Value::Array(comment_views));

    html_page(&state, "post.html", ctx, notice.is_some())
}

/// GET /new-post - blank post form (admin only).
pub async fn new_form(
    state: web::Data<AppState>,
    admin: RequireAdmin,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let notice = flash::peek(&req);
    let mut ctx = page_context(Some(&admin.0), notice.as_deref());
    ctx.insert("heading".to_string(), json!("New Post"));
    ctx.insert("action".to_string(), json!("/new-post"));
    ctx.insert("form".to_string(), Value::Null);

    html_page(&state, "make-post.html", ctx, notice.is_some())
}

/// POST /new-post - insert a post dated today (admin only).
pub async fn create(
    state: web::Data<AppState>,
    admin: RequireAdmin,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if let Err(msg) = form.validate() {
        return Ok(flash::redirect_with_notice("/new-post", &msg));
    }

    let post = Post::new(
        admin.0.id,
        form.title,
        form.subtitle,
        form.body,
        form.img_url,
        Utc::now().date_naive(),
    );

    // A duplicate title violates the unique index and surfaces as 409.
    state.posts.insert(post).await?;

    Ok(flash::redirect("/"))
}

/// GET /edit-post/{id} - post form prefilled with the current fields (admin only).
pub async fn edit_form(
    state: web::Data<AppState>,
    admin: RequireAdmin,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    let notice = flash::peek(&req);
    let mut ctx = page_context(Some(&admin.0), notice.as_deref());
    ctx.insert("heading".to_string(), json!("Edit Post"));
    ctx.insert("action".to_string(), json!(format!("/edit-post/{id}")));
    ctx.insert(
        "form".to_string(),
        json!({
            "title": post.title,
            "subtitle": post.subtitle,
            "img_url": post.img_url,
            "body": post.body,
        }),
    );

    html_page(&state, "make-post.html", ctx, notice.is_some())
}

/// POST /edit-post/{id} - mutate the four editable fields in place (admin only).
pub async fn update(
    state: web::Data<AppState>,
    _admin: RequireAdmin,
    path: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = form.into_inner();

    if let Err(msg) = form.validate() {
        return Ok(flash::redirect_with_notice(&format!("/edit-post/{id}"), &msg));
    }

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    post.edit(form.title, form.subtitle, form.img_url, form.body);
    state.posts.update(post).await?;

    Ok(flash::redirect(&format!("/post/{id}")))
}

/// POST /delete/{id} - remove a post and, through the schema, its comments
/// (admin only).
pub async fn delete(
    state: web::Data<AppState>,
    _admin: RequireAdmin,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state.posts.delete(id).await?;

    Ok(flash::redirect("/"))
}
