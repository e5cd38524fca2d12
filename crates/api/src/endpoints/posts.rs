//! Post endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use quill_common::AppResult;
use quill_core::post::{CreatePostInput, PostDetail, PostPage, PostWithMeta, UpdatePostInput};
use quill_core::PAGE_SIZE;
use quill_db::entities::{category, post};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::comments::{self, CommentResponse},
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{self, ApiResponse, PageResponse},
};

// ==================== Request/Response Types ====================

/// Listing page query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
}

const fn default_page() -> u64 {
    1
}

/// Category summary embedded in post responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub title: String,
    pub slug: String,
}

impl From<category::Model> for CategorySummary {
    fn from(c: category::Model) -> Self {
        Self {
            title: c.title,
            slug: c.slug,
        }
    }
}

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub text: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub pub_date: String,
    pub is_published: bool,
    pub category_id: Option<String>,
    /// Present when the listing loaded the category.
    pub category: Option<CategorySummary>,
    pub comment_count: i64,
    pub created_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            author_id: p.author_id,
            title: p.title,
            text: p.text,
            location: p.location,
            image_url: p.image_url,
            pub_date: p.pub_date.to_rfc3339(),
            is_published: p.is_published,
            category_id: p.category_id,
            category: None,
            comment_count: 0,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

impl From<PostWithMeta> for PostResponse {
    fn from(meta: PostWithMeta) -> Self {
        let mut response = Self::from(meta.post);
        response.category = meta.category.map(Into::into);
        response.comment_count = meta.comment_count;
        response
    }
}

impl From<PostPage> for PageResponse<PostResponse> {
    fn from(page: PostPage) -> Self {
        Self {
            items: page.posts.into_iter().map(Into::into).collect(),
            page: page.page,
            page_size: PAGE_SIZE,
            total: page.total,
        }
    }
}

/// Post detail response (post plus comments).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<PostDetail> for PostDetailResponse {
    fn from(detail: PostDetail) -> Self {
        let comment_count = i64::try_from(detail.comments.len()).unwrap_or(i64::MAX);
        let mut post = PostResponse::from(detail.post);
        post.category = detail.category.map(Into::into);
        post.comment_count = comment_count;

        Self {
            post,
            comments: detail.comments.into_iter().map(Into::into).collect(),
        }
    }
}

// ==================== Handlers ====================

/// The index listing: posts visible to the viewer, newest first.
async fn index(
    user: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<PostResponse>>> {
    let viewer = user.viewer();
    let page = state.post_service.list_index(&viewer, query.page).await?;

    Ok(ApiResponse::ok(page.into()))
}

/// Show a post with its comments.
async fn show(
    user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let viewer = user.viewer();
    let detail = state.post_service.get_detail(&id, &viewer).await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Create a new post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Update a post (author only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.update(&id, &user.id, input).await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Delete a post (author only).
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.post_service.delete(&id, &user.id).await?;

    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
        .merge(comments::router())
}
