use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a user is allowed to do. The first account ever registered becomes
/// the blog's administrator; everyone after that can only read and comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Reader => "reader",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "reader" => Some(Role::Reader),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User entity - an account that can log in, comment, and (if admin) manage posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

impl User {
    /// Create a new user with a generated id.
    pub fn new(email: String, password_hash: String, name: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role,
        }
    }
}
