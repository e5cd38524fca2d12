//! HTTP API layer for quill.
//!
//! This crate provides the JSON REST API:
//!
//! - **Endpoints**: posts, categories, comments, profiles, auth
//! - **Extractors**: required and optional authentication
//! - **Middleware**: bearer-token authentication
//! - **Responses**: uniform envelope and page wrapper
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
