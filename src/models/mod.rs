//! Data models for the Gazette blog
//!
//! Plain entity structs mirroring the database schema. Aggregate wrappers
//! (`PostWithCommentCount`, `TagWithPostCount`, `CommentWithAuthor`) carry
//! the counts and joined fields the query layer attaches.

pub mod comment;
pub mod post;
pub mod tag;
pub mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use post::{Post, PostWithCommentCount};
pub use tag::{Tag, TagWithPostCount};
pub use user::User;
