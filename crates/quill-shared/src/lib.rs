//! # Quill Shared
//!
//! Types shared across the HTTP surface: the urlencoded form payloads and
//! their validation rules.

pub mod forms;

pub use forms::{CommentForm, LoginForm, PostForm, RegisterForm};
