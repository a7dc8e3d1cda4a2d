//! Post repository
//!
//! Read-shaping operations over posts: year filters, popularity ranking by
//! like count, comment-count aggregates, and eager author loads.
//!
//! Likes-count and comments-count are never combined in one query: the
//! double LEFT JOIN would multiply rows and corrupt both aggregates. The
//! comment counts for an already-selected set of posts run as a separate
//! aggregate (`comment_counts_for`) and are merged by id in memory by the
//! caller.

use crate::db::DbPool;
use crate::models::{Post, PostWithCommentCount, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::TimeZone;
use chrono::Utc;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Get a post by its unique slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// Posts published in the given calendar year, ascending by published_at
    async fn list_in_year(&self, year: i32) -> Result<Vec<Post>>;

    /// Posts ordered by like count descending; ties broken by id descending
    async fn list_popular(&self, limit: i64) -> Result<Vec<Post>>;

    /// Posts ordered by published_at descending, each annotated with its
    /// comment count in the same query
    async fn list_fresh_with_comment_counts(&self, limit: i64)
        -> Result<Vec<PostWithCommentCount>>;

    /// One aggregate query mapping post id to comment count, for exactly
    /// the given ids. Posts without comments are present with count 0.
    async fn comment_counts_for(&self, ids: &[i64]) -> Result<HashMap<i64, i64>>;

    /// Map post id to its author, one query for the whole set
    async fn authors_for(&self, ids: &[i64]) -> Result<HashMap<i64, User>>;

    /// Number of likes for one post
    async fn like_count(&self, post_id: i64) -> Result<i64>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DbPool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "p.id, p.title, p.text, p.slug, p.image_url, p.published_at, p.author_id";

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, text, slug, image_url, published_at, author_id
            FROM posts
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by slug")?;

        match row {
            Some(row) => Ok(Some(row_to_post(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_in_year(&self, year: i32) -> Result<Vec<Post>> {
        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .context("Invalid year")?;
        let end = Utc
            .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
            .single()
            .context("Invalid year")?;

        let rows = sqlx::query(
            r#"
            SELECT id, title, text, slug, image_url, published_at, author_id
            FROM posts
            WHERE published_at >= ? AND published_at < ?
            ORDER BY published_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts by year")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn list_popular(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {POST_COLUMNS}, COUNT(pl.user_id) AS like_count
            FROM posts p
            LEFT JOIN post_likes pl ON pl.post_id = p.id
            GROUP BY p.id
            ORDER BY like_count DESC, p.id DESC
            LIMIT ?
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list popular posts")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn list_fresh_with_comment_counts(
        &self,
        limit: i64,
    ) -> Result<Vec<PostWithCommentCount>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {POST_COLUMNS}, COUNT(c.id) AS comment_count
            FROM posts p
            LEFT JOIN comments c ON c.post_id = p.id
            GROUP BY p.id
            ORDER BY p.published_at DESC
            LIMIT ?
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list fresh posts")?;

        let mut posts = Vec::new();
        for row in rows {
            let post = row_to_post(&row)?;
            let comment_count: i64 = row.get("comment_count");
            posts.push(PostWithCommentCount::new(post, comment_count));
        }

        Ok(posts)
    }

    async fn comment_counts_for(&self, ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            r#"
            SELECT p.id, COUNT(c.id) AS comment_count
            FROM posts p
            LEFT JOIN comments c ON c.post_id = p.id
            WHERE p.id IN ({placeholders})
            GROUP BY p.id
            "#
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(*id);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to count comments for posts")?;

        let mut counts = HashMap::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            let comment_count: i64 = row.get("comment_count");
            counts.insert(id, comment_count);
        }

        Ok(counts)
    }

    async fn authors_for(&self, ids: &[i64]) -> Result<HashMap<i64, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            r#"
            SELECT p.id AS post_id, u.id, u.username, u.is_staff
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.id IN ({placeholders})
            "#
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(*id);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to load post authors")?;

        let mut authors = HashMap::with_capacity(rows.len());
        for row in rows {
            let post_id: i64 = row.get("post_id");
            authors.insert(
                post_id,
                User {
                    id: row.get("id"),
                    username: row.get("username"),
                    is_staff: row.get("is_staff"),
                },
            );
        }

        Ok(authors)
    }

    async fn like_count(&self, post_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM post_likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count likes")?;

        Ok(row.get("count"))
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        slug: row.get("slug"),
        image_url: row.get("image_url"),
        published_at: row.get("published_at"),
        author_id: row.get("author_id"),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Raw-SQL seed helpers shared by the repository and service tests.

    use crate::db::{migrations, DbPool};
    use chrono::{DateTime, TimeZone, Utc};

    pub async fn setup_pool() -> DbPool {
        let pool = crate::db::create_test_pool()
            .await
            .expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    pub async fn seed_user(pool: &DbPool, username: &str, is_staff: bool) -> i64 {
        let result = sqlx::query("INSERT INTO users (username, is_staff) VALUES (?, ?)")
            .bind(username)
            .bind(is_staff)
            .execute(pool)
            .await
            .expect("Failed to insert user");
        result.last_insert_rowid()
    }

    pub async fn seed_post(
        pool: &DbPool,
        author_id: i64,
        slug: &str,
        published_at: DateTime<Utc>,
    ) -> i64 {
        let result = sqlx::query(
            "INSERT INTO posts (title, text, slug, image_url, published_at, author_id) \
             VALUES (?, ?, ?, NULL, ?, ?)",
        )
        .bind(format!("Title for {}", slug))
        .bind(format!("Body text for {}", slug))
        .bind(slug)
        .bind(published_at)
        .bind(author_id)
        .execute(pool)
        .await
        .expect("Failed to insert post");
        result.last_insert_rowid()
    }

    pub async fn seed_tag(pool: &DbPool, title: &str) -> i64 {
        let result = sqlx::query("INSERT INTO tags (title) VALUES (?)")
            .bind(title)
            .execute(pool)
            .await
            .expect("Failed to insert tag");
        result.last_insert_rowid()
    }

    pub async fn tag_post(pool: &DbPool, post_id: i64, tag_id: i64) {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(pool)
            .await
            .expect("Failed to tag post");
    }

    pub async fn like_post(pool: &DbPool, post_id: i64, user_id: i64) {
        sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await
            .expect("Failed to like post");
    }

    pub async fn seed_comment(
        pool: &DbPool,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> i64 {
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, text, published_at) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .bind(published_at)
        .execute(pool)
        .await
        .expect("Failed to insert comment");
        result.last_insert_rowid()
    }
}
