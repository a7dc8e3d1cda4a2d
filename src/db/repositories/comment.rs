//! Comment repository

use crate::db::DbPool;
use crate::models::{Comment, CommentWithAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a post with their author usernames, oldest first
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DbPool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.post_id, c.author_id, c.text, c.published_at, u.username
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.published_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments for post")?;

        Ok(rows
            .iter()
            .map(|row| CommentWithAuthor {
                comment: Comment {
                    id: row.get("id"),
                    post_id: row.get("post_id"),
                    author_id: row.get("author_id"),
                    text: row.get("text"),
                    published_at: row.get("published_at"),
                },
                author_username: row.get("username"),
            })
            .collect())
    }
}
