//! Form payloads posted by the browser.
//!
//! Each form knows its own validation rules; a failed validation returns the
//! notice to flash back at the user, never a server error.

use serde::{Deserialize, Serialize};

/// Form to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required.".to_string());
        }
        if self.email.is_empty() || !self.email.contains('@') {
            return Err("Invalid email address.".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters.".to_string());
        }
        Ok(())
    }
}

/// Form to log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Form to create or edit a post. The same four fields serve both flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required.".to_string());
        }
        if self.subtitle.trim().is_empty() {
            return Err("Subtitle is required.".to_string());
        }
        if self.img_url.trim().is_empty() {
            return Err("Image URL is required.".to_string());
        }
        if self.body.trim().is_empty() {
            return Err("Body is required.".to_string());
        }
        Ok(())
    }
}

/// Form to leave a comment under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub body: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.body.trim().is_empty() {
            return Err("Comment cannot be empty.".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_form_rejects_bad_input() {
        let form = RegisterForm {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "longenough".into(),
        };
        assert_eq!(form.validate(), Err("Invalid email address.".to_string()));

        let form = RegisterForm {
            name: "A".into(),
            email: "a@example.com".into(),
            password: "short".into(),
        };
        assert_eq!(
            form.validate(),
            Err("Password must be at least 8 characters.".to_string())
        );

        let form = RegisterForm {
            name: "A".into(),
            email: "a@example.com".into(),
            password: "longenough".into(),
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn post_form_requires_every_field() {
        let form = PostForm {
            title: "  ".into(),
            subtitle: "s".into(),
            img_url: "i".into(),
            body: "b".into(),
        };
        assert!(form.validate().is_err());

        let form = PostForm {
            title: "t".into(),
            subtitle: "s".into(),
            img_url: "i".into(),
            body: "b".into(),
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn comment_form_rejects_blank_comments() {
        let form = CommentForm { body: "\n".into() };
        assert!(form.validate().is_err());
    }
}
