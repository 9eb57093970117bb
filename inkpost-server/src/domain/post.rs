use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        author_id: Uuid,
        title: String,
        body: String,
        pub_date: DateTime<Utc>,
        is_published: bool,
        category_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            body,
            pub_date,
            is_published,
            author_id,
            category_id,
            location_id,
            created_at: Utc::now(),
        }
    }
}

/// Denormalized read model backing every listing and detail endpoint:
/// one row per post with its author, category, optional location and the
/// aggregated comment count already attached.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub category_id: Uuid,
    pub category_title: String,
    pub category_slug: String,
    pub category_is_published: bool,
    pub location_name: Option<String>,
    pub comment_count: i64,
}

impl PostView {
    /// Whether `viewer` may read this post at instant `now`.
    ///
    /// The author always sees their own post. Anyone else sees it only when
    /// the post and its category are both published and the scheduled
    /// publish time has passed. The two flags are one conjunction, never
    /// evaluated independently.
    pub fn visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        viewer == Some(self.author_id)
            || (self.is_published && self.category_is_published && self.pub_date <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn view(author_id: Uuid, is_published: bool, category_is_published: bool, pub_date: DateTime<Utc>) -> PostView {
        PostView {
            id: Uuid::new_v4(),
            title: "title".into(),
            body: "body".into(),
            pub_date,
            is_published,
            created_at: Utc::now(),
            author_id,
            author_username: "author".into(),
            category_id: Uuid::new_v4(),
            category_title: "general".into(),
            category_slug: "general".into(),
            category_is_published,
            location_name: None,
            comment_count: 0,
        }
    }

    #[test]
    fn published_post_is_visible_to_anyone() {
        let now = Utc::now();
        let post = view(Uuid::new_v4(), true, true, now - Duration::hours(1));
        assert!(post.visible_to(None, now));
        assert!(post.visible_to(Some(Uuid::new_v4()), now));
    }

    #[test]
    fn author_sees_own_post_regardless_of_publication_state() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let post = view(author, false, false, now + Duration::days(1));
        assert!(post.visible_to(Some(author), now));
    }

    #[test]
    fn unpublished_post_is_hidden_from_others() {
        let now = Utc::now();
        let post = view(Uuid::new_v4(), false, true, now - Duration::hours(1));
        assert!(!post.visible_to(None, now));
        assert!(!post.visible_to(Some(Uuid::new_v4()), now));
    }

    #[test]
    fn unpublished_category_hides_published_post() {
        let now = Utc::now();
        let post = view(Uuid::new_v4(), true, false, now - Duration::hours(1));
        assert!(!post.visible_to(Some(Uuid::new_v4()), now));
    }

    #[test]
    fn future_pub_date_hides_post_until_due() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let post = view(author, true, true, now + Duration::minutes(5));
        assert!(!post.visible_to(None, now));
        // once the clock reaches the scheduled time it becomes visible
        assert!(post.visible_to(None, now + Duration::minutes(5)));
    }

    #[test]
    fn anonymous_viewer_never_matches_an_author() {
        let now = Utc::now();
        let post = view(Uuid::new_v4(), false, true, now - Duration::hours(1));
        assert!(!post.visible_to(None, now));
    }
}
