pub mod auth;
pub mod category;
pub mod comment;
pub mod post;
pub mod profile;

use actix_web::{HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::category_repository::PostgresCategoryRepository;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::user_repository::PostgresUserRepository;

pub type Posts = PostService<PostgresPostRepository, PostgresCategoryRepository>;
pub type Auth = AuthService<PostgresUserRepository>;
pub type Comments = CommentService<PostgresCommentRepository>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
