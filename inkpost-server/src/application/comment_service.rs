use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentService<R: CommentRepository + 'static> {
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: CommentRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }

    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        self.repo.list_for_post(post_id).await
    }

    /// Callers are responsible for checking that the post is publicly
    /// visible before creating a comment against it.
    #[instrument(skip(self, body))]
    pub async fn create_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        body: String,
    ) -> Result<Comment, DomainError> {
        let body = body.trim().to_owned();
        if body.is_empty() {
            return Err(DomainError::Validation("comment must not be empty".into()));
        }
        self.repo.create(Comment::new(author_id, post_id, body)).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_comment(
        &self,
        author_id: Uuid,
        comment_id: Uuid,
        body: String,
    ) -> Result<Comment, DomainError> {
        let body = body.trim().to_owned();
        if body.is_empty() {
            return Err(DomainError::Validation("comment must not be empty".into()));
        }
        match self.repo.update(comment_id, author_id, body).await {
            Ok(Some(comment)) => Ok(comment),
            Ok(None) => Err(DomainError::CommentNotFound(comment_id)),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        author_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        let deleted = self.repo.delete(comment_id, author_id).await?;
        if deleted == 0 {
            return Err(DomainError::CommentNotFound(comment_id));
        }
        Ok(())
    }
}
