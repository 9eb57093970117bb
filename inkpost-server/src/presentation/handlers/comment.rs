use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateCommentRequest, UpdateCommentRequest};
use crate::presentation::handlers::{Comments, Posts};
use crate::presentation::utils::{
    AuthenticatedUser, ensure_author, post_detail_route, request_id,
};
use actix_web::{HttpRequest, HttpResponse, delete, post, put, web};
use tracing::info;
use uuid::Uuid;

#[post("/posts/{id}/comments")]
pub async fn create_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<Posts>,
    comments: web::Data<Comments>,
    payload: web::Json<CreateCommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    // Comments only attach to publicly visible posts; authors get no
    // override here.
    let post = posts.published_post(post_id).await?;

    let comment = comments
        .create_comment(user.id, post.id, payload.into_inner().body)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        comment_id = %comment.id,
        "comment created"
    );

    Ok(HttpResponse::Created().json(comment))
}

#[put("/comments/{id}")]
pub async fn update_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<Comments>,
    payload: web::Json<UpdateCommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    let existing = comments.get_comment(comment_id).await?;
    ensure_author(existing.author_id, &user, post_detail_route(existing.post_id))?;

    let comment = comments
        .update_comment(user.id, comment_id, payload.into_inner().body)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        comment_id = %comment.id,
        "comment updated"
    );

    Ok(HttpResponse::Ok().json(comment))
}

#[delete("/comments/{id}")]
pub async fn delete_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<Comments>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    let existing = comments.get_comment(comment_id).await?;
    ensure_author(existing.author_id, &user, post_detail_route(existing.post_id))?;

    comments.delete_comment(user.id, comment_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        comment_id = %comment_id,
        "comment deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
