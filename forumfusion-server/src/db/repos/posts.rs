//! Post repository
//!
//! Handles post CRUD with:
//! - Paginated feed, newest first or by net votes
//! - Tag substring search for the banner
//! - Cascading delete (comments and votes go with the post)

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::{like_pattern, Body, Email, Paginated, Pagination, TagName, Title};
use super::DbError;

/// Post record from database
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub up_vote: i32,
    pub down_vote: i32,
    pub comments_count: i32,
    pub post_time: DateTime<Utc>,
}

/// Validated fields for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_name: String,
    pub author_email: Email,
    pub author_image: Option<String>,
    pub title: Title,
    pub description: Body,
    pub tags: Vec<TagName>,
}

/// Feed ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSort {
    /// Highest `up_vote - down_vote` first
    Popularity,
    /// Newest `post_time` first
    #[default]
    Recent,
}

impl FeedSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Recent => "recent",
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Self::Popularity => "(up_vote - down_vote) DESC, post_time DESC",
            Self::Recent => "post_time DESC",
        }
    }
}

const POST_COLUMNS: &str = "id, author_name, author_email, author_image, title, description, \
                            tags, up_vote, down_vote, comments_count, post_time";

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a post with zeroed counters.
    pub async fn create(&self, post: NewPost) -> Result<Post, DbError> {
        let tags: Vec<String> = post.tags.into_iter().map(TagName::into_string).collect();

        let created: Post = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (author_name, author_email, author_image, title, description, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.author_name)
        .bind(post.author_email.as_str())
        .bind(post.author_image.as_deref())
        .bind(post.title.as_str())
        .bind(post.description.as_str())
        .bind(&tags)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Paged feed in the requested order.
    pub async fn feed(&self, sort: FeedSort, page: Pagination) -> Result<Paginated<Post>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {POST_COLUMNS}, COUNT(*) OVER() as total
            FROM posts
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            sort.order_by()
        ))
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None => self.count().await?,
        };
        let items = rows
            .iter()
            .map(Post::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Total number of posts.
    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// All posts by an author, oldest first.
    pub async fn by_author(&self, email: &str) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_email = $1 ORDER BY post_time"
        ))
        .bind(email.to_lowercase())
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// All posts by an author, newest first.
    pub async fn recent_by_author(&self, email: &str) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_email = $1 ORDER BY post_time DESC"
        ))
        .bind(email.to_lowercase())
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// Get a single post by ID.
    pub async fn get(&self, id: Uuid) -> Result<Post, DbError> {
        sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("post", id))
    }

    /// Delete a post. Comments and votes cascade.
    ///
    /// Returns the number of deleted posts (0 or 1).
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Posts carrying at least one tag that contains `term`, ignoring case.
    /// No term returns every post.
    pub async fn search_by_tag(&self, term: Option<&str>) -> Result<Vec<Post>, DbError> {
        let posts = match term {
            Some(term) => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $1)
                    ORDER BY post_time DESC
                    "#
                ))
                .bind(like_pattern(term))
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {POST_COLUMNS} FROM posts ORDER BY post_time DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };
        Ok(posts)
    }
}
