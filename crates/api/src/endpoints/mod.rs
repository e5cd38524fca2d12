//! API endpoints.

mod auth;
mod categories;
mod comments;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::me_router())
        .nest("/posts", posts::router())
        .nest("/categories", categories::router())
        .nest("/users", users::router())
}
