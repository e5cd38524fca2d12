//! User profile endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use quill_common::AppResult;
use quill_core::user::UpdateProfileInput;
use quill_db::entities::user;
use serde::Serialize;

use crate::{
    endpoints::posts::{PageQuery, PostResponse},
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, PageResponse},
};

/// Public profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Own-account response (includes the email address).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<user::Model> for AccountResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

/// Show a user's public profile.
async fn show(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_by_username(&username).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// List a user's posts.
///
/// The profile's own user sees the full history; everyone else only live
/// posts.
async fn posts(
    user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<PostResponse>>> {
    let viewer = user.viewer();
    let page = state
        .post_service
        .list_by_author(&username, &viewer, query.page)
        .await?;

    Ok(ApiResponse::ok(page.into()))
}

/// Edit the authenticated user's own profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let user = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(show))
        .route("/{username}/posts", get(posts))
}

/// Routes for the authenticated user's own account.
pub fn me_router() -> Router<AppState> {
    Router::new().route("/i", put(update_me))
}
