use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostView};
use crate::presentation::dto::UpdatePostRequest;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};
use uuid::Uuid;

/// Scope of a post listing: `All` when the viewer is the author of every
/// post the query can return, `Published` for everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Published,
}

/// Declarative description of a post listing. Every listing endpoint (home
/// feed, category page, profile, detail lookup) is one of these, rendered
/// into a single SQL statement by [`compose`].
#[derive(Debug, Clone)]
pub struct PostQuery {
    scope: Scope,
    id: Option<Uuid>,
    author_id: Option<Uuid>,
    category_slug: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PostQuery {
    pub fn all() -> Self {
        Self {
            scope: Scope::All,
            id: None,
            author_id: None,
            category_slug: None,
            limit: None,
            offset: None,
        }
    }

    pub fn published() -> Self {
        Self {
            scope: Scope::Published,
            ..Self::all()
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, slug: &str) -> Self {
        self.category_slug = Some(slug.to_owned());
        self
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Base projection: posts joined with category, author and optional
/// location, plus the aggregated comment count, so a single round-trip
/// carries everything a listing or detail page renders.
const POST_VIEW_SELECT: &str = r#"
SELECT
    p.id, p.title, p.body, p.pub_date, p.is_published, p.created_at,
    p.author_id, u.username AS author_username,
    p.category_id, c.title AS category_title, c.slug AS category_slug,
    c.is_published AS category_is_published,
    l.name AS location_name,
    COALESCE(cc.comment_count, 0) AS comment_count
FROM posts p
JOIN categories c ON c.id = p.category_id
JOIN users u ON u.id = p.author_id
LEFT JOIN locations l ON l.id = p.location_id
LEFT JOIN (
    SELECT post_id, COUNT(*) AS comment_count
    FROM comments
    GROUP BY post_id
) cc ON cc.post_id = p.id"#;

/// The publication predicate applied at the collection level. Post- and
/// category-level flags form one conjunction with the schedule check.
const PUBLISHED_PREDICATE: &str = "p.is_published AND c.is_published AND p.pub_date <= now()";

fn compose(query: &PostQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(POST_VIEW_SELECT);

    let has_filters = query.scope == Scope::Published
        || query.id.is_some()
        || query.author_id.is_some()
        || query.category_slug.is_some();
    if has_filters {
        qb.push(" WHERE ");
        let mut cond = qb.separated(" AND ");
        if query.scope == Scope::Published {
            cond.push(PUBLISHED_PREDICATE);
        }
        if let Some(id) = query.id {
            cond.push("p.id = ").push_bind_unseparated(id);
        }
        if let Some(author_id) = query.author_id {
            cond.push("p.author_id = ").push_bind_unseparated(author_id);
        }
        if let Some(slug) = &query.category_slug {
            cond.push("c.slug = ").push_bind_unseparated(slug.clone());
        }
    }

    qb.push(" ORDER BY p.pub_date DESC");
    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = query.offset {
        qb.push(" OFFSET ").push_bind(offset);
    }
    qb
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_one(&self, query: &PostQuery) -> Result<Option<PostView>, DomainError>;
    async fn list(&self, query: &PostQuery) -> Result<Vec<PostView>, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<u64, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, title, body, pub_date, is_published, author_id, category_id, location_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.pub_date)
        .bind(post.is_published)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(post.location_id)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_one(&self, query: &PostQuery) -> Result<Option<PostView>, DomainError> {
        compose(query)
            .build_query_as::<PostView>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error fetching post: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<PostView>, DomainError> {
        compose(query)
            .build_query_as::<PostView>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                body = COALESCE($2, body),
                pub_date = COALESCE($3, pub_date),
                is_published = COALESCE($4, is_published),
                category_id = COALESCE($5, category_id),
                location_id = COALESCE($6, location_id)
            WHERE id = $7 AND author_id = $8
            RETURNING id, title, body, pub_date, is_published, author_id, category_id, location_id, created_at
            "#,
        )
        .bind(update.title)
        .bind(update.body)
        .bind(update.pub_date)
        .bind(update.is_published)
        .bind(update.category_id)
        .bind(update.location_id)
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<u64, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if deleted.rows_affected() > 0 {
            info!(post_id = %id, "post deleted");
        }
        Ok(deleted.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_scope_applies_publication_conjunction() {
        let sql = compose(&PostQuery::published()).into_sql();
        assert!(sql.contains("p.is_published AND c.is_published AND p.pub_date <= now()"));
    }

    #[test]
    fn all_scope_has_no_publication_filter() {
        let sql = compose(&PostQuery::all().by_author(Uuid::new_v4())).into_sql();
        assert!(!sql.contains("p.is_published AND c.is_published"));
        assert!(sql.contains("p.author_id = $1"));
    }

    #[test]
    fn unfiltered_query_has_no_where_clause() {
        assert!(!compose(&PostQuery::all()).into_sql().contains("WHERE"));
    }

    #[test]
    fn every_variant_orders_by_pub_date_descending() {
        for query in [
            PostQuery::all(),
            PostQuery::published(),
            PostQuery::published().in_category("travel"),
            PostQuery::all().by_author(Uuid::new_v4()).paginate(10, 0),
        ] {
            assert!(compose(&query).into_sql().contains("ORDER BY p.pub_date DESC"));
        }
    }

    #[test]
    fn narrowing_filters_chain_as_conjunction() {
        let query = PostQuery::published()
            .in_category("travel")
            .paginate(10, 20);
        let sql = compose(&query).into_sql();
        assert!(sql.contains("WHERE"));
        assert!(sql.contains("c.slug = $1"));
        assert!(sql.contains("LIMIT $2"));
        assert!(sql.contains("OFFSET $3"));
        // pagination comes after ordering
        let order_at = sql.find("ORDER BY").unwrap();
        assert!(sql.find("LIMIT").unwrap() > order_at);
    }

    #[test]
    fn detail_lookup_binds_post_id() {
        let id = Uuid::new_v4();
        assert!(
            compose(&PostQuery::all().with_id(id))
                .into_sql()
                .contains("p.id = $1")
        );
        assert!(
            compose(&PostQuery::published().with_id(id))
                .into_sql()
                .contains("p.id = $1")
        );
    }

    #[test]
    fn projection_carries_denormalized_fields() {
        let sql = compose(&PostQuery::published()).into_sql();
        for column in [
            "author_username",
            "category_title",
            "category_slug",
            "category_is_published",
            "location_name",
            "comment_count",
        ] {
            assert!(sql.contains(column), "missing column {}", column);
        }
    }
}
