use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            body,
            post_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}

/// Comment joined with its author's username, as rendered under a post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
}
