use crate::domain::category::Category;
use crate::domain::comment::CommentView;
use crate::domain::post::PostView;
use crate::domain::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String, // "Bearer"
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    /// Scheduled publish time; omitted means "now".
    pub pub_date: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

/// One listing page plus its continuation coordinates.
#[derive(Debug, Serialize)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub page: u32,
    pub page_size: u32,
    pub count: usize,
}

impl PostPage {
    pub fn new(posts: Vec<PostView>, page: u32, page_size: u32) -> Self {
        let count = posts.len();
        Self {
            posts,
            page: page.max(1),
            page_size,
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPostsResponse {
    pub category: Category,
    #[serde(flatten)]
    pub page: PostPage,
}

// ======================= PROFILES =======================

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: User,
    #[serde(flatten)]
    pub page: PostPage,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

// ======================= Utils =======================
fn default_page() -> u32 {
    1
}
