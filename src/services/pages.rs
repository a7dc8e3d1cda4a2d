//! Page assembly service
//!
//! Composes repository reads into complete page contexts. Each page method
//! issues one batched query per relation (comment counts, authors, tags)
//! instead of per-post lookups, then merges the maps by post id. A post id
//! missing from an aggregate map is a data fault and fails the whole page.

use std::sync::Arc;

use thiserror::Error;

use crate::db::repositories::{CommentRepository, PostRepository, TagRepository};
use crate::models::{Post, PostWithCommentCount};
use crate::services::context::{
    CommentView, ContactsContext, HomeContext, PostDetail, PostDetailContext, PostSummary,
    TagFilterContext, TagSummary,
};

/// Number of posts and tags shown in the side panels
pub const SIDE_PANEL_LIMIT: i64 = 5;

/// Number of posts shown on the tag listing page
pub const TAG_PAGE_LIMIT: i64 = 20;

/// Page assembly errors
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Service assembling the read-only pages of the site
pub struct PageService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PageService {
    /// Create a new page service
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
        }
    }

    /// Home page: most liked posts, freshest posts, and most used tags
    pub async fn home(&self) -> Result<HomeContext, PageError> {
        let popular = self.posts.list_popular(SIDE_PANEL_LIMIT).await?;
        let most_popular_posts = self.summarize(&popular).await?;

        let fresh = self
            .posts
            .list_fresh_with_comment_counts(SIDE_PANEL_LIMIT)
            .await?;
        let page_posts = self.summarize_counted(&fresh).await?;

        Ok(HomeContext {
            most_popular_posts,
            page_posts,
            popular_tags: self.popular_tags().await?,
        })
    }

    /// Post detail page for the given slug
    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailContext, PageError> {
        let post = self
            .posts
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| PageError::NotFound(format!("No post with slug '{}'", slug)))?;

        let authors = self.posts.authors_for(&[post.id]).await?;
        let author = authors
            .get(&post.id)
            .ok_or_else(|| PageError::Invariant(format!("No author for post '{}'", post.slug)))?;

        let comments = self.comments.list_for_post(post.id).await?;
        let likes_amount = self.posts.like_count(post.id).await?;
        let mut tag_map = self.tags.list_for_posts(&[post.id]).await?;
        let tags = tag_map.remove(&post.id).unwrap_or_default();

        let detail = PostDetail {
            title: post.title.clone(),
            text: post.text.clone(),
            author: author.username.clone(),
            comments: comments.iter().map(CommentView::from).collect(),
            likes_amount,
            image_url: post.image_url.clone(),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: tags.iter().map(TagSummary::from).collect(),
        };

        let popular = self.posts.list_popular(SIDE_PANEL_LIMIT).await?;

        Ok(PostDetailContext {
            post: detail,
            popular_tags: self.popular_tags().await?,
            most_popular_posts: self.summarize(&popular).await?,
        })
    }

    /// Tag listing page for the given tag title.
    ///
    /// The post list is the sitewide recent feed, not scoped to the tag;
    /// the tag itself only drives the page heading.
    pub async fn tag_filter(&self, title: &str) -> Result<TagFilterContext, PageError> {
        let tag = self
            .tags
            .get_by_title(title)
            .await?
            .ok_or_else(|| PageError::NotFound(format!("No tag with title '{}'", title)))?;

        let recent = self
            .posts
            .list_fresh_with_comment_counts(TAG_PAGE_LIMIT)
            .await?;
        let posts = self.summarize_counted(&recent).await?;

        let popular = self.posts.list_popular(SIDE_PANEL_LIMIT).await?;

        Ok(TagFilterContext {
            tag,
            popular_tags: self.popular_tags().await?,
            posts,
            most_popular_posts: self.summarize(&popular).await?,
        })
    }

    /// Contacts page: static content, nothing to read
    pub async fn contacts(&self) -> Result<ContactsContext, PageError> {
        Ok(ContactsContext {})
    }

    async fn popular_tags(&self) -> Result<Vec<TagSummary>, PageError> {
        let tags = self.tags.list_popular(SIDE_PANEL_LIMIT).await?;
        Ok(tags.iter().map(TagSummary::from).collect())
    }

    /// Summarize posts whose comment counts still have to be fetched.
    ///
    /// Counts come from one aggregate query keyed by post id. Every input
    /// post must appear in the result map; a missing id means the aggregate
    /// and the selection disagree about which posts exist.
    async fn summarize(&self, posts: &[Post]) -> Result<Vec<PostSummary>, PageError> {
        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let counts = self.posts.comment_counts_for(&ids).await?;
        let authors = self.posts.authors_for(&ids).await?;
        let tag_map = self.tags.list_for_posts(&ids).await?;

        posts
            .iter()
            .map(|post| {
                let comment_count = counts.get(&post.id).copied().ok_or_else(|| {
                    PageError::Invariant(format!("No comment count for post '{}'", post.slug))
                })?;
                let author = authors.get(&post.id).ok_or_else(|| {
                    PageError::Invariant(format!("No author for post '{}'", post.slug))
                })?;
                let tags = tag_map.get(&post.id).map(Vec::as_slice).unwrap_or(&[]);
                PostSummary::new(post, author, comment_count, tags)
            })
            .collect()
    }

    /// Summarize posts that already carry their comment counts
    async fn summarize_counted(
        &self,
        posts: &[PostWithCommentCount],
    ) -> Result<Vec<PostSummary>, PageError> {
        let ids: Vec<i64> = posts.iter().map(|counted| counted.post.id).collect();
        let authors = self.posts.authors_for(&ids).await?;
        let tag_map = self.tags.list_for_posts(&ids).await?;

        posts
            .iter()
            .map(|counted| {
                let post = &counted.post;
                let author = authors.get(&post.id).ok_or_else(|| {
                    PageError::Invariant(format!("No author for post '{}'", post.slug))
                })?;
                let tags = tag_map.get(&post.id).map(Vec::as_slice).unwrap_or(&[]);
                PostSummary::new(post, author, counted.comment_count, tags)
            })
            .collect()
    }
}
