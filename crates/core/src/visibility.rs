//! Post visibility and ownership predicates.
//!
//! The rules that decide what a request may see or mutate, as pure
//! functions over already-fetched rows:
//!
//! - a post is **live** when it is published, its `pub_date` is not in the
//!   future, and its category (if it has one) is itself published;
//! - a post is **visible** to a viewer when it is live or the viewer is
//!   its author (owner preview);
//! - posts and comments may only be mutated by their author.
//!
//! Listing queries re-express the live/visible rules in SQL (see
//! `quill_db::repositories::post`); single-entity checks go through here.

use chrono::{DateTime, Utc};
use quill_db::entities::{category, comment, post};

/// The identity attached to an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    /// No authenticated user.
    #[default]
    Anonymous,
    /// An authenticated user, by ID.
    User(String),
}

impl Viewer {
    /// Build a viewer from an optional authenticated user ID.
    #[must_use]
    pub fn from_user_id(user_id: Option<String>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    /// The viewer's user ID, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    /// Returns whether this viewer is the given user.
    #[must_use]
    pub fn is(&self, user_id: &str) -> bool {
        matches!(self, Self::User(id) if id == user_id)
    }
}

/// Returns whether a post is live at `now`.
///
/// `category` must be the post's category when it has one; a post without
/// a category is gated by its own flags alone.
#[must_use]
pub fn is_live(
    post: &post::Model,
    category: Option<&category::Model>,
    now: DateTime<Utc>,
) -> bool {
    post.is_published
        && post.pub_date.with_timezone(&Utc) <= now
        && category.is_none_or(|c| c.is_published)
}

/// Returns whether the viewer may see the post in listings or detail.
///
/// Live posts are visible to everyone; the author additionally sees their
/// own unpublished, future-dated, or hidden-category posts.
#[must_use]
pub fn can_view(
    post: &post::Model,
    category: Option<&category::Model>,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> bool {
    is_live(post, category, now) || viewer.is(&post.author_id)
}

/// Returns whether the viewer may edit or delete the post.
#[must_use]
pub fn can_edit_post(post: &post::Model, viewer: &Viewer) -> bool {
    viewer.is(&post.author_id)
}

/// Returns whether the viewer may edit or delete the comment.
#[must_use]
pub fn can_edit_comment(comment: &comment::Model, viewer: &Viewer) -> bool {
    viewer.is(&comment.author_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_post(author_id: &str, pub_date: DateTime<Utc>, is_published: bool) -> post::Model {
        post::Model {
            id: "post1".to_string(),
            author_id: author_id.to_string(),
            category_id: Some("cat1".to_string()),
            title: "Test post".to_string(),
            text: "Body".to_string(),
            location: None,
            image_url: None,
            pub_date: pub_date.into(),
            is_published,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_category(is_published: bool) -> category::Model {
        category::Model {
            id: "cat1".to_string(),
            title: "Test category".to_string(),
            slug: "test".to_string(),
            description: "A category".to_string(),
            is_published,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_comment(author_id: &str) -> comment::Model {
        comment::Model {
            id: "comment1".to_string(),
            post_id: "post1".to_string(),
            author_id: author_id.to_string(),
            text: "A comment".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn published_past_post_in_published_category_is_live() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), true);
        let category = test_category(true);

        assert!(is_live(&post, Some(&category), now));
    }

    #[test]
    fn future_post_is_not_live() {
        let now = Utc::now();
        let post = test_post("alice", now + Duration::days(1), true);
        let category = test_category(true);

        assert!(!is_live(&post, Some(&category), now));
    }

    #[test]
    fn pub_date_exactly_now_is_live() {
        let now = Utc::now();
        let post = test_post("alice", now, true);

        assert!(is_live(&post, None, now));
    }

    #[test]
    fn unpublished_post_is_not_live() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), false);
        let category = test_category(true);

        assert!(!is_live(&post, Some(&category), now));
    }

    #[test]
    fn unpublished_category_hides_published_post() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), true);
        let category = test_category(false);

        assert!(!is_live(&post, Some(&category), now));
    }

    #[test]
    fn post_without_category_is_gated_by_own_flags() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), true);

        assert!(is_live(&post, None, now));
    }

    #[test]
    fn live_post_is_visible_to_everyone() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), true);
        let category = test_category(true);

        assert!(can_view(&post, Some(&category), &Viewer::Anonymous, now));
        assert!(can_view(
            &post,
            Some(&category),
            &Viewer::User("bob".to_string()),
            now
        ));
    }

    #[test]
    fn author_previews_future_post() {
        let now = Utc::now();
        let post = test_post("alice", now + Duration::days(1), true);
        let category = test_category(true);

        assert!(can_view(
            &post,
            Some(&category),
            &Viewer::User("alice".to_string()),
            now
        ));
    }

    #[test]
    fn future_post_is_hidden_from_others() {
        let now = Utc::now();
        let post = test_post("alice", now + Duration::days(1), true);
        let category = test_category(true);

        assert!(!can_view(&post, Some(&category), &Viewer::Anonymous, now));
        assert!(!can_view(
            &post,
            Some(&category),
            &Viewer::User("bob".to_string()),
            now
        ));
    }

    #[test]
    fn author_previews_hidden_category_post() {
        let now = Utc::now();
        let post = test_post("alice", now - Duration::hours(1), true);
        let category = test_category(false);

        assert!(can_view(
            &post,
            Some(&category),
            &Viewer::User("alice".to_string()),
            now
        ));
        assert!(!can_view(
            &post,
            Some(&category),
            &Viewer::User("bob".to_string()),
            now
        ));
    }

    #[test]
    fn only_author_may_edit_post() {
        let now = Utc::now();
        let post = test_post("alice", now, true);

        assert!(can_edit_post(&post, &Viewer::User("alice".to_string())));
        assert!(!can_edit_post(&post, &Viewer::User("bob".to_string())));
        assert!(!can_edit_post(&post, &Viewer::Anonymous));
    }

    #[test]
    fn only_author_may_edit_comment() {
        let comment = test_comment("alice");

        assert!(can_edit_comment(&comment, &Viewer::User("alice".to_string())));
        assert!(!can_edit_comment(&comment, &Viewer::User("bob".to_string())));
        assert!(!can_edit_comment(&comment, &Viewer::Anonymous));
    }

    #[test]
    fn viewer_from_user_id() {
        assert_eq!(Viewer::from_user_id(None), Viewer::Anonymous);
        assert_eq!(
            Viewer::from_user_id(Some("alice".to_string())),
            Viewer::User("alice".to_string())
        );
        assert_eq!(Viewer::User("alice".to_string()).user_id(), Some("alice"));
        assert_eq!(Viewer::Anonymous.user_id(), None);
    }
}
