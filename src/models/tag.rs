//! Tag model
//!
//! Tags are lowercase labels attachable to many posts. Uniqueness and the
//! lowercase form are enforced by the schema.

use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag title, unique and lowercase
    pub title: String,
}

/// Tag with the number of posts carrying it
///
/// Used both for the popular-tags panel and for the per-post tag sets
/// attached by the query layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithPostCount {
    #[serde(flatten)]
    pub tag: Tag,
    /// Number of posts tagged with this tag
    pub post_count: i64,
}

impl TagWithPostCount {
    pub fn new(tag: Tag, post_count: i64) -> Self {
        Self { tag, post_count }
    }
}
