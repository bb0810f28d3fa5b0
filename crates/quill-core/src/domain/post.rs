use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post written by the administrator.
///
/// `published_on` is a calendar date, not a timestamp; it is stamped once at
/// creation and never changed by edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
    pub published_on: NaiveDate,
}

impl Post {
    /// Create a new post with a generated id.
    pub fn new(
        author_id: Uuid,
        title: String,
        subtitle: String,
        body: String,
        img_url: String,
        published_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            subtitle,
            body,
            img_url,
            published_on,
        }
    }

    /// Apply an edit. Only the four editable fields change; id, author, and
    /// publication date stay as they were.
    pub fn edit(&mut self, title: String, subtitle: String, img_url: String, body: String) {
        self.title = title;
        self.subtitle = subtitle;
        self.img_url = img_url;
        self.body = body;
    }
}
