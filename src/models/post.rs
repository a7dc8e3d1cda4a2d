//! Post model
//!
//! A `Post` is a single blog article. Posts carry a unique URL slug, an
//! optional header image, and a publication timestamp; likes and tags are
//! stored in junction tables and surfaced through the query layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Full body text
    pub text: String,
    /// URL-friendly slug, unique across all posts
    pub slug: String,
    /// URL of the header image, if any
    pub image_url: Option<String>,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
    /// Author user ID; authors must be staff, enforced by the admin tooling
    pub author_id: i64,
}

/// Post annotated with its comment count in a single aggregate query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithCommentCount {
    #[serde(flatten)]
    pub post: Post,
    /// Number of comments attached to the post
    pub comment_count: i64,
}

impl PostWithCommentCount {
    pub fn new(post: Post, comment_count: i64) -> Self {
        Self {
            post,
            comment_count,
        }
    }
}
