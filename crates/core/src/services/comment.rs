//! Comment service.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::entities::comment;
use quill_db::repositories::{CommentRepository, PostRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::visibility::{self, Viewer};

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

/// Input for updating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

/// Service for managing comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on a post.
    ///
    /// The post must be visible to the commenting user; a hidden post is a
    /// uniform not-found.
    pub async fn create(
        &self,
        user_id: &str,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let (post, category) = self
            .post_repo
            .find_with_category(post_id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

        let viewer = Viewer::User(user_id.to_string());
        if !visibility::can_view(&post, category.as_ref(), &viewer, Utc::now()) {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        let id = self.id_gen.generate();
        let now = Utc::now();

        let model = comment::ActiveModel {
            id: Set(id),
            post_id: Set(post.id),
            author_id: Set(user_id.to_string()),
            text: Set(input.text),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.comment_repo.create(model).await
    }

    /// Look up a comment scoped to its post and author.
    ///
    /// The author filter is part of the query, so a non-owner observes a
    /// not-found outcome rather than a permission error.
    async fn get_owned(
        &self,
        post_id: &str,
        comment_id: &str,
        user_id: &str,
    ) -> AppResult<comment::Model> {
        let comment = self
            .comment_repo
            .find_by_id_for_author(comment_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;

        if comment.post_id != post_id {
            return Err(AppError::NotFound(format!("comment {comment_id}")));
        }

        Ok(comment)
    }

    /// Edit a comment.
    pub async fn update(
        &self,
        post_id: &str,
        comment_id: &str,
        user_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let comment = self.get_owned(post_id, comment_id, user_id).await?;

        let mut active: comment::ActiveModel = comment.into();
        active.text = Set(input.text);
        active.updated_at = Set(Some(Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete a comment.
    pub async fn delete(&self, post_id: &str, comment_id: &str, user_id: &str) -> AppResult<()> {
        let comment = self.get_owned(post_id, comment_id, user_id).await?;

        self.comment_repo.delete(&comment.id).await
    }
}
