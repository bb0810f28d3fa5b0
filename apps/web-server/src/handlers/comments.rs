//! Commenting under a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::ports::BaseRepository;
use quill_shared::forms::CommentForm;

use crate::flash;
use crate::middleware::auth::MaybeUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const LOGIN_TO_COMMENT: &str = "You need to log in or register in order to leave comments.";

/// POST /post/{id} - insert a comment as the logged-in user.
///
/// Anonymous submissions create nothing and are sent to the login page.
pub async fn add_comment(
    state: web::Data<AppState>,
    user: MaybeUser,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let Some(user) = user.0 else {
        return Ok(flash::redirect_with_notice("/login", LOGIN_TO_COMMENT));
    };

    let form = form.into_inner();
    if let Err(msg) = form.validate() {
        return Ok(flash::redirect_with_notice(&format!("/post/{post_id}"), &msg));
    }

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }

    state
        .comments
        .insert(Comment::new(post_id, user.id, form.body))
        .await?;

    Ok(flash::redirect(&format!("/post/{post_id}")))
}
