//! Route contract tests over in-memory stores.

use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Role, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PasswordService, PostRepository, RenderError,
    SessionService, TemplateRenderer, UserRepository,
};
use quill_infra::{Argon2Passwords, Gravatar, JwtSessions, SessionConfig};
use quill_shared::forms::{CommentForm, LoginForm, PostForm, RegisterForm};

use crate::state::AppState;

#[derive(Default)]
struct MemUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("duplicate email".to_string()));
        }
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
struct MemPosts {
    rows: Mutex<Vec<Post>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.title == post.title) {
            return Err(RepoError::Constraint("duplicate title".to_string()));
        }
        rows.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemPosts {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.rows.lock().unwrap().clone();
        posts.sort_by(|a, b| b.published_on.cmp(&a.published_on));
        Ok(posts)
    }
}

#[derive(Default)]
struct MemComments {
    rows: Mutex<Vec<Comment>>,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemComments {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.rows.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemComments {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }
}

/// Renders nothing real; route tests only care about status codes, redirects,
/// and cookies.
struct StubRenderer;

impl TemplateRenderer for StubRenderer {
    fn render(&self, view: &str, _data: &serde_json::Value) -> Result<String, RenderError> {
        Ok(format!("<view:{view}>"))
    }
}

fn test_state() -> (AppState, Arc<MemUsers>, Arc<MemPosts>, Arc<MemComments>) {
    let users = Arc::new(MemUsers::default());
    let posts = Arc::new(MemPosts::default());
    let comments = Arc::new(MemComments::default());

    let state = AppState {
        users: users.clone(),
        posts: posts.clone(),
        comments: comments.clone(),
        passwords: Arc::new(Argon2Passwords::new()),
        sessions: Arc::new(JwtSessions::new(SessionConfig {
            secret: "test-secret".to_string(),
            ttl_hours: 1,
            issuer: "quill-test".to_string(),
        })),
        renderer: Arc::new(StubRenderer),
        avatars: Arc::new(Gravatar::default()),
    };

    (state, users, posts, comments)
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(super::configure_routes),
        )
        .await
    };
}

async fn seed_user(state: &AppState, email: &str, name: &str, password: &str, role: Role) -> User {
    let hash = state.passwords.hash(password).unwrap();
    state
        .users
        .insert(User::new(email.to_string(), hash, name.to_string(), role))
        .await
        .unwrap()
}

async fn seed_post(state: &AppState, author: &User, title: &str) -> Post {
    state
        .posts
        .insert(Post::new(
            author.id,
            title.to_string(),
            "Subtitle".to_string(),
            "Body".to_string(),
            "https://img.example/cover.png".to_string(),
            Utc::now().date_naive(),
        ))
        .await
        .unwrap()
}

fn session_for(state: &AppState, user: &User) -> Cookie<'static> {
    Cookie::new("session", state.sessions.issue(user).unwrap())
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn cookie_value(resp: &actix_web::dev::ServiceResponse, name: &str) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

fn flash_notice(resp: &actix_web::dev::ServiceResponse) -> Option<String> {
    cookie_value(resp, "flash")
        .map(|v| urlencoding::decode(&v).unwrap().into_owned())
}

#[actix_web::test]
async fn register_creates_the_user_and_logs_it_in() {
    let (state, users, _, _) = test_state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(RegisterForm {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "password8".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        "/"
    );
    assert!(cookie_value(&resp, "session").is_some_and(|v| !v.is_empty()));

    let rows = users.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    // The first account ever registered is the administrator.
    assert_eq!(rows[0].role, Role::Admin);
    assert_ne!(rows[0].password_hash, "password8");
}

#[actix_web::test]
async fn duplicate_registration_never_creates_a_second_row() {
    let (state, users, _, _) = test_state();
    let app = service!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(RegisterForm {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password: "password8".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        if resp.headers().get(header::LOCATION).unwrap() == "/login" {
            assert_eq!(
                flash_notice(&resp).as_deref(),
                Some("We already have this address on file, please log in.")
            );
            assert!(cookie_value(&resp, "session").is_none());
        }
    }

    assert_eq!(users.rows.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn later_registrations_are_readers() {
    let (state, users, _, _) = test_state();
    let app = service!(state);

    for email in ["first@x.com", "second@x.com"] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(RegisterForm {
                name: "User".to_string(),
                email: email.to_string(),
                password: "password8".to_string(),
            })
            .to_request();
        test::call_service(&app, req).await;
    }

    let rows = users.rows.lock().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].role, Role::Admin);
    assert_eq!(rows[1].role, Role::Reader);
}

#[actix_web::test]
async fn invalid_registration_input_is_a_notice_not_an_error() {
    let (state, users, _, _) = test_state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(RegisterForm {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "password8".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/register");
    assert_eq!(flash_notice(&resp).as_deref(), Some("Invalid email address."));
    assert!(users.rows.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn login_with_wrong_password_leaves_no_session() {
    let (state, _, _, _) = test_state();
    seed_user(&state, "a@x.com", "A", "right-password", Role::Reader).await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            email: "a@x.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(flash_notice(&resp).as_deref(), Some("Invalid password"));
    assert!(cookie_value(&resp, "session").is_none());
}

#[actix_web::test]
async fn login_with_unknown_email_says_unknown_user() {
    let (state, _, _, _) = test_state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            email: "nobody@x.com".to_string(),
            password: "whatever1".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/login");
    assert_eq!(flash_notice(&resp).as_deref(), Some("Unknown user"));
}

#[actix_web::test]
async fn login_establishes_a_session_for_that_exact_user() {
    let (state, _, _, _) = test_state();
    seed_user(&state, "a@x.com", "A", "password-a", Role::Reader).await;
    let b = seed_user(&state, "b@x.com", "B", "password-b", Role::Reader).await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            email: "b@x.com".to_string(),
            password: "password-b".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/");
    let token = cookie_value(&resp, "session").unwrap();
    let claims = state.sessions.validate(&token).unwrap();
    assert_eq!(claims.user_id, b.id);
}

#[actix_web::test]
async fn admin_gate_redirects_anonymous_to_the_listing() {
    let (state, _, _, _) = test_state();
    let app = service!(state);

    let req = test::TestRequest::get().uri("/new-post").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn admin_gate_forbids_other_users() {
    let (state, _, _, _) = test_state();
    let reader = seed_user(&state, "r@x.com", "R", "password8", Role::Reader).await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/new-post")
        .cookie(session_for(&state, &reader))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn the_admin_reaches_the_post_form() {
    let (state, _, _, _) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/new-post")
        .cookie(session_for(&state, &admin))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn anonymous_comment_creates_nothing_and_redirects_to_login() {
    let (state, _, _, comments) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let post = seed_post(&state, &admin, "First post").await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/post/{}", post.id))
        .set_form(CommentForm {
            body: "Nice post!".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(
        flash_notice(&resp).as_deref(),
        Some("You need to log in or register in order to leave comments.")
    );
    assert!(comments.rows.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn logged_in_comment_creates_exactly_one_linked_row() {
    let (state, _, _, comments) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let reader = seed_user(&state, "r@x.com", "R", "password8", Role::Reader).await;
    let post = seed_post(&state, &admin, "First post").await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/post/{}", post.id))
        .cookie(session_for(&state, &reader))
        .set_form(CommentForm {
            body: "Nice post!".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/post/{}", post.id));

    let rows = comments.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].post_id, post.id);
    assert_eq!(rows[0].commenter_id, reader.id);
    assert_eq!(rows[0].body, "Nice post!");
}

#[actix_web::test]
async fn a_duplicate_title_is_rejected_not_duplicated() {
    let (state, _, posts, _) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    seed_post(&state, &admin, "Same title").await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/new-post")
        .cookie(session_for(&state, &admin))
        .set_form(PostForm {
            title: "Same title".to_string(),
            subtitle: "Other subtitle".to_string(),
            img_url: "https://img.example/other.png".to_string(),
            body: "Other body".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(posts.rows.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn editing_changes_only_the_four_editable_fields() {
    let (state, _, posts, _) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let post = seed_post(&state, &admin, "Original title").await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/edit-post/{}", post.id))
        .cookie(session_for(&state, &admin))
        .set_form(PostForm {
            title: "Updated title".to_string(),
            subtitle: "Updated subtitle".to_string(),
            img_url: "https://img.example/updated.png".to_string(),
            body: "Updated body".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/post/{}", post.id));

    let rows = posts.rows.lock().unwrap();
    assert_eq!(rows[0].title, "Updated title");
    assert_eq!(rows[0].subtitle, "Updated subtitle");
    assert_eq!(rows[0].img_url, "https://img.example/updated.png");
    assert_eq!(rows[0].body, "Updated body");
    assert_eq!(rows[0].id, post.id);
    assert_eq!(rows[0].author_id, admin.id);
    assert_eq!(rows[0].published_on, post.published_on);
}

#[actix_web::test]
async fn deleting_a_post_removes_the_row() {
    let (state, _, posts, _) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let post = seed_post(&state, &admin, "Doomed").await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/delete/{}", post.id))
        .cookie(session_for(&state, &admin))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert!(posts.rows.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn unknown_post_ids_are_404() {
    let (state, _, _, _) = test_state();
    let admin = seed_user(&state, "admin@x.com", "Admin", "password8", Role::Admin).await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/post/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/delete/{}", Uuid::new_v4()))
        .cookie(session_for(&state, &admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn logout_clears_the_session_cookie() {
    let (state, _, _, _) = test_state();
    let reader = seed_user(&state, "r@x.com", "R", "password8", Role::Reader).await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(session_for(&state, &reader))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(cookie_value(&resp, "session").as_deref(), Some(""));
}
