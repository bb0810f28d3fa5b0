use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - written by a logged-in user under a post.
/// Comments are immutable once created; there is no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub commenter_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment with a generated id and the current time.
    pub fn new(post_id: Uuid, commenter_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            commenter_id,
            body,
            created_at: Utc::now(),
        }
    }
}
