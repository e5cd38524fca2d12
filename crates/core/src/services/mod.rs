//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod email;
pub mod post;
pub mod user;

pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use email::EmailService;
pub use post::{
    CreatePostInput, PostDetail, PostPage, PostService, PostWithMeta, UpdatePostInput, PAGE_SIZE,
};
pub use user::{CreateUserInput, UpdateProfileInput, UserService};
