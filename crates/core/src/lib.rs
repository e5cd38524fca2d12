//! Core business logic for quill.

pub mod services;
pub mod visibility;

pub use services::*;
pub use visibility::Viewer;
