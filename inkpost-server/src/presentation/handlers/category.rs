use crate::domain::error::DomainError;
use crate::presentation::dto::{CategoryPostsResponse, PageQuery, PostPage};
use crate::presentation::handlers::Posts;
use actix_web::{HttpResponse, get, web};

#[get("/categories/{slug}/posts")]
pub async fn category_posts(
    posts: web::Data<Posts>,
    query: web::Query<PageQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let (category, items) = posts.category_page(&slug, query.page).await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category,
        page: PostPage::new(items, query.page, posts.page_size()),
    }))
}
