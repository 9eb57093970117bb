use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreatePostRequest, PageQuery, PostDetailResponse, PostPage, UpdatePostRequest,
};
use crate::presentation::handlers::{Comments, Posts};
use crate::presentation::utils::{
    AuthenticatedUser, MaybeUser, ensure_author, post_detail_route, request_id,
};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/posts")]
pub async fn list_posts(
    posts: web::Data<Posts>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let items = posts.home_page(query.page).await?;
    Ok(HttpResponse::Ok().json(PostPage::new(items, query.page, posts.page_size())))
}

#[get("/posts/{id}")]
pub async fn get_post(
    viewer: MaybeUser,
    posts: web::Data<Posts>,
    comments: web::Data<Comments>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.detail(post_id, viewer.id()).await?;
    let comments = comments.comments_for_post(post_id).await?;
    Ok(HttpResponse::Ok().json(PostDetailResponse { post, comments }))
}

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<Posts>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.create_post(user.id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
pub async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<Posts>,
    payload: web::Json<UpdatePostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let existing = posts.get_post(post_id).await?;
    ensure_author(existing.author_id, &user, post_detail_route(post_id))?;

    let post = posts
        .update_post(user.id, post_id, payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<Posts>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let existing = posts.get_post(post_id).await?;
    ensure_author(existing.author_id, &user, post_detail_route(post_id))?;

    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
