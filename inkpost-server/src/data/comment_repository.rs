use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        body: String,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<u64, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, body, post_id, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.body)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, body, post_id, author_id, created_at
            FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find comment {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        sqlx::query_as::<_, CommentView>(
            r#"
            SELECT m.id, m.body, m.post_id, m.author_id, u.username AS author_username, m.created_at
            FROM comments m
            JOIN users u ON u.id = m.author_id
            WHERE m.post_id = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error listing comments for post {}: {}", post_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        body: String,
    ) -> Result<Option<Comment>, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET body = $1
            WHERE id = $2 AND author_id = $3
            RETURNING id, body, post_id, author_id, created_at
            "#,
        )
        .bind(body)
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update comment {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if comment.is_some() {
            info!(comment_id = %id, "comment updated");
        }
        Ok(comment)
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<u64, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if deleted.rows_affected() > 0 {
            info!(comment_id = %id, "comment deleted");
        }
        Ok(deleted.rows_affected())
    }
}
