//! Tag repository
//!
//! Tags are ranked by how many posts carry them. `list_for_posts` eager
//! loads the tags of a whole page of posts in one query so the assemblers
//! never loop over per-post tag lookups.

use crate::db::DbPool;
use crate::models::{Tag, TagWithPostCount};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get a tag by its unique title
    async fn get_by_title(&self, title: &str) -> Result<Option<Tag>>;

    /// Tags ordered by post count descending; ties broken by title ascending
    async fn list_popular(&self, limit: i64) -> Result<Vec<TagWithPostCount>>;

    /// Map post id to its tags, each annotated with its total post count.
    /// Tags are ordered by title within each post.
    async fn list_for_posts(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<TagWithPostCount>>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: DbPool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_by_title(&self, title: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, title FROM tags WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by title")?;

        Ok(row.map(|row| Tag {
            id: row.get("id"),
            title: row.get("title"),
        }))
    }

    async fn list_popular(&self, limit: i64) -> Result<Vec<TagWithPostCount>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.title, COUNT(pt.post_id) AS post_count
            FROM tags t
            LEFT JOIN post_tags pt ON pt.tag_id = t.id
            GROUP BY t.id
            ORDER BY post_count DESC, t.title ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list popular tags")?;

        Ok(rows
            .iter()
            .map(|row| {
                TagWithPostCount::new(
                    Tag {
                        id: row.get("id"),
                        title: row.get("title"),
                    },
                    row.get("post_count"),
                )
            })
            .collect())
    }

    async fn list_for_posts(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<TagWithPostCount>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            r#"
            SELECT pt.post_id, t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS post_count
            FROM post_tags pt
            INNER JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id IN ({placeholders})
            ORDER BY pt.post_id, t.title ASC
            "#
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(*id);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to load tags for posts")?;

        let mut tags: HashMap<i64, Vec<TagWithPostCount>> = HashMap::new();
        for row in rows {
            let post_id: i64 = row.get("post_id");
            tags.entry(post_id).or_default().push(TagWithPostCount::new(
                Tag {
                    id: row.get("id"),
                    title: row.get("title"),
                },
                row.get("post_count"),
            ));
        }

        Ok(tags)
    }
}
