//! Comment endpoints, nested under posts.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use quill_common::AppResult;
use quill_core::comment::{CreateCommentInput, UpdateCommentInput};
use quill_db::entities::comment;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            author_id: c.author_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Comment on a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create(&user.id, &post_id, input)
        .await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// Edit a comment (author only; others observe not-found).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .update(&post_id, &comment_id, &user.id, input)
        .await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// Delete a comment (author only; others observe not-found).
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .comment_service
        .delete(&post_id, &comment_id, &user.id)
        .await?;

    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    // Param name matches the sibling post routes; axum requires agreement
    // at the same path position.
    Router::new()
        .route("/{id}/comments", post(create))
        .route("/{id}/comments/{comment_id}", put(update).delete(destroy))
}
