//! Page context records
//!
//! Flattened, template-ready views of the domain models. Everything here is
//! plain data: strings, counts, and timestamps, shaped the way the templates
//! consume them. Building a record can fail when the underlying data breaks
//! a page invariant, such as a post carrying no tags.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CommentWithAuthor, Post, Tag, TagWithPostCount, User};
use crate::services::pages::PageError;

/// Teaser length in characters, counted on char boundaries
pub const TEASER_LEN: usize = 200;

/// A tag with its sitewide usage count
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub title: String,
    pub posts_with_tag: i64,
}

impl From<&TagWithPostCount> for TagSummary {
    fn from(tag: &TagWithPostCount) -> Self {
        Self {
            title: tag.tag.title.clone(),
            posts_with_tag: tag.post_count,
        }
    }
}

/// A post as shown in list pages and side panels
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub teaser: String,
    pub author: String,
    pub comment_count: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
    pub first_tag_title: String,
}

impl PostSummary {
    /// Build a summary from a post, its author, comment count, and tags.
    ///
    /// Every summarized post must carry at least one tag; a tagless post is
    /// reported as an invariant violation rather than rendered with a hole.
    pub fn new(
        post: &Post,
        author: &User,
        comment_count: i64,
        tags: &[TagWithPostCount],
    ) -> Result<Self, PageError> {
        let first_tag_title = tags
            .first()
            .map(|tag| tag.tag.title.clone())
            .ok_or_else(|| PageError::Invariant(format!("Post '{}' has no tags", post.slug)))?;

        Ok(Self {
            title: post.title.clone(),
            teaser: teaser(&post.text),
            author: author.username.clone(),
            comment_count,
            image_url: post.image_url.clone(),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: tags.iter().map(TagSummary::from).collect(),
            first_tag_title,
        })
    }
}

/// A comment as shown under a post
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

impl From<&CommentWithAuthor> for CommentView {
    fn from(comment: &CommentWithAuthor) -> Self {
        Self {
            text: comment.comment.text.clone(),
            published_at: comment.comment.published_at,
            author: comment.author_username.clone(),
        }
    }
}

/// A single post with its full text, comments, and like count
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
}

/// Context for the home page
#[derive(Debug, Clone, Serialize)]
pub struct HomeContext {
    pub most_popular_posts: Vec<PostSummary>,
    pub page_posts: Vec<PostSummary>,
    pub popular_tags: Vec<TagSummary>,
}

/// Context for the post detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailContext {
    pub post: PostDetail,
    pub popular_tags: Vec<TagSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

/// Context for the contacts page, which carries no data
#[derive(Debug, Clone, Serialize)]
pub struct ContactsContext {}

/// Context for the tag listing page
#[derive(Debug, Clone, Serialize)]
pub struct TagFilterContext {
    pub tag: Tag,
    pub popular_tags: Vec<TagSummary>,
    pub posts: Vec<PostSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

/// First `TEASER_LEN` characters of the text, never splitting a character
pub fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagWithPostCount;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample_post(text: &str) -> Post {
        Post {
            id: 1,
            title: "Title".to_string(),
            text: text.to_string(),
            slug: "title".to_string(),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
            author_id: 1,
        }
    }

    fn sample_author() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            is_staff: true,
        }
    }

    fn sample_tag(title: &str, count: i64) -> TagWithPostCount {
        TagWithPostCount::new(
            Tag {
                id: 1,
                title: title.to_string(),
            },
            count,
        )
    }

    #[test]
    fn test_teaser_short_text_kept_whole() {
        assert_eq!(teaser("short"), "short");
    }

    #[test]
    fn test_teaser_truncates_at_200_chars() {
        let text = "a".repeat(500);
        let teaser = teaser(&text);
        assert_eq!(teaser.chars().count(), 200);
    }

    #[test]
    fn test_teaser_counts_chars_not_bytes() {
        let text = "é".repeat(300);
        let teaser = teaser(&text);
        assert_eq!(teaser.chars().count(), 200);
        assert_eq!(teaser.len(), 400);
    }

    #[test]
    fn test_summary_uses_first_tag() {
        let post = sample_post("body");
        let tags = vec![sample_tag("rust", 3), sample_tag("web", 1)];
        let summary = PostSummary::new(&post, &sample_author(), 2, &tags).unwrap();

        assert_eq!(summary.first_tag_title, "rust");
        assert_eq!(summary.tags.len(), 2);
        assert_eq!(summary.comment_count, 2);
        assert_eq!(summary.author, "alice");
    }

    #[test]
    fn test_summary_rejects_tagless_post() {
        let post = sample_post("body");
        let result = PostSummary::new(&post, &sample_author(), 0, &[]);

        match result {
            Err(PageError::Invariant(message)) => assert!(message.contains("title")),
            other => panic!("Expected invariant violation, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn teaser_never_exceeds_limit(text in ".{0,400}") {
            let teaser = teaser(&text);
            prop_assert!(teaser.chars().count() <= TEASER_LEN);
        }

        #[test]
        fn teaser_is_a_prefix(text in ".{0,400}") {
            let teaser = teaser(&text);
            prop_assert!(text.starts_with(&teaser));
        }
    }
}
