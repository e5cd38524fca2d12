//! Post service.

use chrono::{DateTime, Utc};
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::entities::{category, comment, post};
use quill_db::repositories::{
    CategoryRepository, CommentRepository, PostRepository, UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::visibility::{self, Viewer};

/// Fixed number of posts per listing page.
pub const PAGE_SIZE: u64 = 10;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub text: String,

    pub category_id: Option<String>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    #[validate(length(max = 2048))]
    pub image_url: Option<String>,

    /// Publication timestamp; defaults to now. Future values schedule
    /// the post.
    pub pub_date: Option<DateTime<Utc>>,

    #[serde(default = "default_true")]
    pub is_published: bool,
}

const fn default_true() -> bool {
    true
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub text: Option<String>,

    pub category_id: Option<Option<String>>,

    #[validate(length(max = 256))]
    pub location: Option<Option<String>>,

    #[validate(length(max = 2048))]
    pub image_url: Option<Option<String>>,

    pub pub_date: Option<DateTime<Utc>>,

    pub is_published: Option<bool>,
}

/// A listed post with its category and derived comment count.
#[derive(Debug, Clone)]
pub struct PostWithMeta {
    pub post: post::Model,
    pub category: Option<category::Model>,
    pub comment_count: i64,
}

/// One page of posts, newest publication first.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostWithMeta>,
    /// 1-based page number.
    pub page: u64,
    /// Total matching posts across all pages.
    pub total: u64,
}

/// A single post with its category and comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: post::Model,
    pub category: Option<category::Model>,
    pub comments: Vec<comment::Model>,
}

/// Service for managing posts and their listings.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    category_repo: CategoryRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        category_repo: CategoryRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            category_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Attach comment counts to listed posts with one aggregated query.
    async fn with_counts(
        &self,
        rows: Vec<(post::Model, Option<category::Model>)>,
    ) -> AppResult<Vec<PostWithMeta>> {
        let ids: Vec<String> = rows.iter().map(|(p, _)| p.id.clone()).collect();
        let counts = self.comment_repo.count_for_posts(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(post, category)| {
                let comment_count = counts.get(&post.id).copied().unwrap_or(0);
                PostWithMeta {
                    post,
                    category,
                    comment_count,
                }
            })
            .collect())
    }

    /// The index listing: posts visible to the viewer, paginated.
    pub async fn list_index(&self, viewer: &Viewer, page: u64) -> AppResult<PostPage> {
        let page = page.max(1);
        let offset = (page - 1) * PAGE_SIZE;

        let rows = self
            .post_repo
            .list_visible(viewer.user_id(), PAGE_SIZE, offset)
            .await?;
        let total = self.post_repo.count_visible(viewer.user_id()).await?;

        Ok(PostPage {
            posts: self.with_counts(rows).await?,
            page,
            total,
        })
    }

    /// The category listing: the published category and its posts visible
    /// to the viewer, paginated.
    ///
    /// An absent or unpublished category is a uniform not-found, for
    /// authors included.
    pub async fn list_category(
        &self,
        slug: &str,
        viewer: &Viewer,
        page: u64,
    ) -> AppResult<(category::Model, PostPage)> {
        let category = self
            .category_repo
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

        let page = page.max(1);
        let offset = (page - 1) * PAGE_SIZE;

        let rows = self
            .post_repo
            .list_visible_in_category(&category.id, viewer.user_id(), PAGE_SIZE, offset)
            .await?;
        let total = self
            .post_repo
            .count_visible_in_category(&category.id, viewer.user_id())
            .await?;

        let posts = PostPage {
            posts: self.with_counts(rows).await?,
            page,
            total,
        };

        Ok((category, posts))
    }

    /// The profile listing: the full post history when the viewer is the
    /// profile's user, otherwise only live posts.
    pub async fn list_by_author(
        &self,
        username: &str,
        viewer: &Viewer,
        page: u64,
    ) -> AppResult<PostPage> {
        let author = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        let include_hidden = viewer.is(&author.id);
        let page = page.max(1);
        let offset = (page - 1) * PAGE_SIZE;

        let rows = self
            .post_repo
            .list_by_author(&author.id, include_hidden, PAGE_SIZE, offset)
            .await?;
        let total = self
            .post_repo
            .count_by_author(&author.id, include_hidden)
            .await?;

        Ok(PostPage {
            posts: self.with_counts(rows).await?,
            page,
            total,
        })
    }

    /// Get a post with comments, applying the visibility rule.
    ///
    /// A post the viewer may not see is indistinguishable from a missing
    /// one.
    pub async fn get_detail(&self, id: &str, viewer: &Viewer) -> AppResult<PostDetail> {
        let (post, category) = self
            .post_repo
            .find_with_category(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))?;

        if !visibility::can_view(&post, category.as_ref(), viewer, Utc::now()) {
            return Err(AppError::PostNotFound(id.to_string()));
        }

        let comments = self.comment_repo.find_by_post(&post.id).await?;

        Ok(PostDetail {
            post,
            category,
            comments,
        })
    }

    /// Create a new post.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        // The category must exist; it need not be published (the post
        // simply stays non-live until the category is).
        if let Some(ref category_id) = input.category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Unknown category".to_string()))?;
        }

        let id = self.id_gen.generate();
        let now = Utc::now();

        let model = post::ActiveModel {
            id: Set(id),
            author_id: Set(author_id.to_string()),
            category_id: Set(input.category_id),
            title: Set(input.title),
            text: Set(input.text),
            location: Set(input.location),
            image_url: Set(input.image_url),
            pub_date: Set(input.pub_date.unwrap_or(now).into()),
            is_published: Set(input.is_published),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.post_repo.create(model).await
    }

    /// Update a post.
    ///
    /// Only the author may edit, in any visibility state; anyone else gets
    /// a forbidden outcome and nothing is mutated.
    pub async fn update(
        &self,
        post_id: &str,
        user_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        let viewer = Viewer::User(user_id.to_string());
        if !visibility::can_edit_post(&post, &viewer) {
            return Err(AppError::Forbidden("Not the post author".to_string()));
        }

        if let Some(Some(ref category_id)) = input.category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Unknown category".to_string()))?;
        }

        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(text) = input.text {
            active.text = Set(text);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(pub_date) = input.pub_date {
            active.pub_date = Set(pub_date.into());
        }
        if let Some(is_published) = input.is_published {
            active.is_published = Set(is_published);
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.post_repo.update(active).await
    }

    /// Delete a post.
    ///
    /// Same ownership rule as [`Self::update`].
    pub async fn delete(&self, post_id: &str, user_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let viewer = Viewer::User(user_id.to_string());
        if !visibility::can_edit_post(&post, &viewer) {
            return Err(AppError::Forbidden("Not the post author".to_string()));
        }

        self.post_repo.delete(&post.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_post(id: &str, author_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            category_id: None,
            title: "Test post".to_string(),
            text: "Body".to_string(),
            location: None,
            image_url: None,
            pub_date: Utc::now().into(),
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with_posts(results: Vec<Vec<post::Model>>) -> PostService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(results)
                .into_connection(),
        );
        PostService::new(
            PostRepository::new(Arc::clone(&db)),
            CommentRepository::new(Arc::clone(&db)),
            CategoryRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let service = service_with_posts(vec![vec![test_post("post1", "alice")]]);

        let result = service
            .update(
                "post1",
                "bob",
                UpdatePostInput {
                    title: Some("Hijacked".to_string()),
                    text: None,
                    category_id: None,
                    location: None,
                    image_url: None,
                    pub_date: None,
                    is_published: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let service = service_with_posts(vec![vec![test_post("post1", "alice")]]);

        let result = service.delete("post1", "bob").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found() {
        let service = service_with_posts(vec![vec![]]);

        let result = service
            .update(
                "missing",
                "alice",
                UpdatePostInput {
                    title: None,
                    text: None,
                    category_id: None,
                    location: None,
                    image_url: None,
                    pub_date: None,
                    is_published: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let service = service_with_posts(vec![]);

        let result = service
            .create(
                "alice",
                CreatePostInput {
                    title: String::new(),
                    text: "Body".to_string(),
                    category_id: None,
                    location: None,
                    image_url: None,
                    pub_date: None,
                    is_published: true,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
