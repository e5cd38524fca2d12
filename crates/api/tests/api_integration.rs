//! API integration tests.
//!
//! These tests verify routing, authentication requirements, and error
//! mapping with a mocked database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use quill_api::{middleware::AppState, router as api_router};
use quill_core::{CommentService, EmailService, PostService, UserService};
use quill_db::entities::post;
use quill_db::repositories::{
    CategoryRepository, CommentRepository, PostRepository, UserProfileRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Build app state over the given (mock) database connection.
fn state_with_db(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let user_profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone(), user_profile_repo);
    let post_service = PostService::new(
        post_repo.clone(),
        comment_repo.clone(),
        category_repo,
        user_repo,
    );
    let comment_service = CommentService::new(comment_repo, post_repo);
    let email_service =
        EmailService::new(None, "Quill Test", "https://example.com").expect("email service");

    AppState {
        user_service,
        post_service,
        comment_service,
        email_service,
    }
}

/// Create a test router over an empty mock database.
fn create_test_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    api_router().with_state(state_with_db(db))
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_error() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_signup_with_short_password_returns_validation_error() {
    let app = create_test_router();

    // Validation runs before any database access
    let response = app
        .oneshot(
            Request::builder()
                .uri("/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","password":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_post_requires_auth() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"title":"Hello","text":"Body"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_profile_requires_auth() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/i")
                .method("PUT")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_comment_mutation_requires_auth() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/post1/comments/comment1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_post_detail_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let app = api_router().with_state(state_with_db(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signin_with_unknown_user_returns_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<quill_db::entities::user::Model>::new()])
        .into_connection();
    let app = api_router().with_state(state_with_db(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signin")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"nonexistent","password":"wrongpassword"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
