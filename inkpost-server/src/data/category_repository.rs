use crate::domain::category::Category;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Category pages only ever resolve published categories; an
    /// unpublished one is indistinguishable from an absent one.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE slug = $1 AND is_published
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find category by slug {}: {}", slug, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }
}
