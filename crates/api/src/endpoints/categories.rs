//! Category endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use quill_common::AppResult;
use quill_db::entities::category;
use serde::Serialize;

use crate::{
    endpoints::posts::{PageQuery, PostResponse},
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::{ApiResponse, PageResponse},
};

/// Category response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            title: c.title,
            slug: c.slug,
            description: c.description,
        }
    }
}

/// Category page response: the category plus one page of its posts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPostsResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}

/// Show a category with its posts.
///
/// An absent or unpublished category is a uniform not-found.
async fn show(
    user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<CategoryPostsResponse>> {
    let viewer = user.viewer();
    let (category, posts) = state
        .post_service
        .list_category(&slug, &viewer, query.page)
        .await?;

    Ok(ApiResponse::ok(CategoryPostsResponse {
        category: category.into(),
        posts: posts.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(show))
}
