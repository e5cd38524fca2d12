//! Post repository.
//!
//! Listing queries express the visibility rule in SQL so pagination and
//! ordering happen in the database: a post row is selectable when it is
//! live (published, `pub_date` in the past, category published or absent)
//! or authored by the viewer.

use std::sync::Arc;

use crate::entities::{category, post, Category, Post};
use chrono::Utc;
use quill_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SelectTwo,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

/// Condition matching live posts: published, not scheduled into the
/// future, and not hidden by an unpublished category.
fn live_condition() -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(Utc::now()))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

/// Condition matching posts visible to the given viewer: live posts, plus
/// the viewer's own posts in any state (owner preview).
fn visible_condition(viewer_id: Option<&str>) -> Condition {
    let live = live_condition();

    match viewer_id {
        Some(id) => Condition::any()
            .add(live)
            .add(post::Column::AuthorId.eq(id)),
        None => live,
    }
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Base select joining each post with its (optional) category, newest
    /// publication first.
    fn select_with_category() -> SelectTwo<Post, Category> {
        Post::find()
            .find_also_related(Category)
            .order_by_desc(post::Column::PubDate)
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Find a post together with its category.
    pub async fn find_with_category(
        &self,
        id: &str,
    ) -> AppResult<Option<(post::Model, Option<category::Model>)>> {
        Post::find_by_id(id)
            .find_also_related(Category)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts visible to the viewer (paginated, newest first).
    pub async fn list_visible(
        &self,
        viewer_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<(post::Model, Option<category::Model>)>> {
        Self::select_with_category()
            .filter(visible_condition(viewer_id))
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts visible to the viewer.
    pub async fn count_visible(&self, viewer_id: Option<&str>) -> AppResult<u64> {
        Post::find()
            .find_also_related(Category)
            .filter(visible_condition(viewer_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts visible to the viewer within a category.
    pub async fn list_visible_in_category(
        &self,
        category_id: &str,
        viewer_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<(post::Model, Option<category::Model>)>> {
        Self::select_with_category()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(visible_condition(viewer_id))
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts visible to the viewer within a category.
    pub async fn count_visible_in_category(
        &self,
        category_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<u64> {
        Post::find()
            .find_also_related(Category)
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(visible_condition(viewer_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts by author (paginated, newest first).
    ///
    /// With `include_hidden` the full history is returned (profile owner);
    /// otherwise only live posts.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        include_hidden: bool,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<(post::Model, Option<category::Model>)>> {
        let mut select = Self::select_with_category()
            .filter(post::Column::AuthorId.eq(author_id));

        if !include_hidden {
            select = select.filter(live_condition());
        }

        select
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by author.
    pub async fn count_by_author(
        &self,
        author_id: &str,
        include_hidden: bool,
    ) -> AppResult<u64> {
        let mut select = Post::find()
            .find_also_related(Category)
            .filter(post::Column::AuthorId.eq(author_id));

        if !include_hidden {
            select = select.filter(live_condition());
        }

        select
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
