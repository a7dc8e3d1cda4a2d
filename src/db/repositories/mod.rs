//! Repositories - the query composition layer
//!
//! Each repository exposes the read-shaping operations the page assemblers
//! compose: year filters, popularity rankings, aggregate counts, and eager
//! loads of related rows. All operations are read-only; entity lifecycle is
//! handled by external admin tooling.

pub mod comment;
pub mod post;
pub mod tag;

pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use tag::{SqlxTagRepository, TagRepository};
