use std::sync::Arc;

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::{PostQuery, PostRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostView};
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

/// Translates a 1-based page number into a LIMIT/OFFSET window.
pub fn page_window(page: u32, page_size: u32) -> (i64, i64) {
    let page = page.max(1) as i64;
    let limit = page_size as i64;
    (limit, (page - 1) * limit)
}

#[derive(Clone)]
pub struct PostService<R, C>
where
    R: PostRepository + 'static,
    C: CategoryRepository + 'static,
{
    posts: Arc<R>,
    categories: Arc<C>,
    page_size: u32,
}

impl<R, C> PostService<R, C>
where
    R: PostRepository + 'static,
    C: CategoryRepository + 'static,
{
    pub fn new(posts: Arc<R>, categories: Arc<C>, page_size: u32) -> Self {
        Self {
            posts,
            categories,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Home feed: published posts only, newest first.
    pub async fn home_page(&self, page: u32) -> Result<Vec<PostView>, DomainError> {
        let (limit, offset) = page_window(page, self.page_size);
        self.posts
            .list(&PostQuery::published().paginate(limit, offset))
            .await
    }

    /// Posts of a published category. An absent or unpublished category is
    /// a not-found, regardless of what posts it holds.
    pub async fn category_page(
        &self,
        slug: &str,
        page: u32,
    ) -> Result<(Category, Vec<PostView>), DomainError> {
        let category = self
            .categories
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(slug.to_owned()))?;

        let (limit, offset) = page_window(page, self.page_size);
        let posts = self
            .posts
            .list(
                &PostQuery::published()
                    .in_category(slug)
                    .paginate(limit, offset),
            )
            .await?;
        Ok((category, posts))
    }

    /// A user's posts. The profile owner sees everything they wrote,
    /// everyone else sees the published subset.
    pub async fn profile_page(
        &self,
        profile_id: Uuid,
        viewer: Option<Uuid>,
        page: u32,
    ) -> Result<Vec<PostView>, DomainError> {
        let query = if viewer == Some(profile_id) {
            PostQuery::all()
        } else {
            PostQuery::published()
        };
        let (limit, offset) = page_window(page, self.page_size);
        self.posts
            .list(&query.by_author(profile_id).paginate(limit, offset))
            .await
    }

    /// Detail lookup. Existence is checked first, then the visibility rule:
    /// an existing but invisible post is indistinguishable from an absent
    /// one.
    pub async fn detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .find_one(&PostQuery::all().with_id(id))
            .await?
            .ok_or(DomainError::PostNotFound(id))?;

        if !post.visible_to(viewer, Utc::now()) {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(post)
    }

    /// The raw record with no visibility applied. Mutation guards fetch
    /// this to learn the author before deciding where to send the caller.
    pub async fn get_post(&self, id: Uuid) -> Result<PostView, DomainError> {
        self.posts
            .find_one(&PostQuery::all().with_id(id))
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// The publicly visible record, author override not applied. Comment
    /// creation gates on this.
    pub async fn published_post(&self, id: Uuid) -> Result<PostView, DomainError> {
        self.posts
            .find_one(&PostQuery::published().with_id(id))
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, req))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        if req.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if req.body.trim().is_empty() {
            return Err(DomainError::Validation("body must not be empty".into()));
        }

        let post = Post::new(
            author_id,
            req.title,
            req.body,
            req.pub_date.unwrap_or_else(Utc::now),
            req.is_published.unwrap_or(true),
            req.category_id,
            req.location_id,
        );
        self.posts.create(post).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_post(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if update.body.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(DomainError::Validation("body must not be empty".into()));
        }

        match self.posts.update(post_id, author_id, update).await {
            Ok(Some(post)) => Ok(post),
            Ok(None) => Err(DomainError::PostNotFound(post_id)),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, author_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let deleted = self.posts.delete(post_id, author_id).await?;
        if deleted == 0 {
            return Err(DomainError::PostNotFound(post_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::page_window;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_window(1, 10), (10, 0));
    }

    #[test]
    fn later_pages_advance_by_page_size() {
        assert_eq!(page_window(3, 10), (10, 20));
        assert_eq!(page_window(2, 25), (25, 25));
    }

    #[test]
    fn page_zero_is_clamped_to_first_page() {
        assert_eq!(page_window(0, 10), (10, 0));
    }
}
