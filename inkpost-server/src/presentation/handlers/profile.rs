use crate::domain::error::DomainError;
use crate::presentation::dto::{PageQuery, PostPage, ProfileResponse, UpdateProfileRequest};
use crate::presentation::handlers::{Auth, Posts};
use crate::presentation::utils::{AuthenticatedUser, MaybeUser, request_id};
use actix_web::{HttpRequest, HttpResponse, get, put, web};
use tracing::info;

#[get("/profiles/{username}")]
pub async fn get_profile(
    viewer: MaybeUser,
    auth: web::Data<Auth>,
    posts: web::Data<Posts>,
    query: web::Query<PageQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let username = path.into_inner();
    let profile = auth.get_user_by_username(&username).await?;

    let items = posts
        .profile_page(profile.id, viewer.id(), query.page)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile,
        page: PostPage::new(items, query.page, posts.page_size()),
    }))
}

#[put("/profile")]
pub async fn update_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    auth: web::Data<Auth>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, DomainError> {
    let updated = auth.update_profile(user.id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        "profile updated"
    );

    Ok(HttpResponse::Ok().json(updated))
}
