//! Comment repository
//!
//! Creating or clearing comments updates `posts.comments_count` in the same
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Body, Email};
use super::DbError;

/// Comment record from database
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: Option<String>,
    pub commenter_email: String,
    pub commenter_name: String,
    pub commenter_image: Option<String>,
    pub comment: String,
    pub feedback: Option<String>,
    pub reported: bool,
    pub comment_time: DateTime<Utc>,
}

/// Validated fields for a new comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub commenter_email: Email,
    pub commenter_name: String,
    pub commenter_image: Option<String>,
    pub comment: Body,
}

const COMMENT_COLUMNS: &str = "id, post_id, post_title, commenter_email, commenter_name, \
                               commenter_image, comment, feedback, reported, comment_time";

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post (atomic with the post's comment counter).
    pub async fn create(&self, post_id: Uuid, comment: NewComment) -> Result<Comment, DbError> {
        let mut tx = self.pool.begin().await?;

        let post_title: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET comments_count = comments_count + 1
            WHERE id = $1
            RETURNING title
            "#,
        )
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(post_title) = post_title else {
            return Err(DbError::not_found("post", post_id));
        };

        let created: Comment = sqlx::query_as(&format!(
            r#"
            INSERT INTO comments (post_id, post_title, commenter_email, commenter_name, commenter_image, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(&post_title)
        .bind(comment.commenter_email.as_str())
        .bind(&comment.commenter_name)
        .bind(comment.commenter_image.as_deref())
        .bind(comment.comment.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Comments on a post, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DbError> {
        let comments = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY comment_time, id"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;
        Ok(comments)
    }

    /// Delete every comment on a post and reset its counter.
    ///
    /// Returns the number of deleted comments.
    pub async fn delete_for_post(&self, post_id: Uuid) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("UPDATE posts SET comments_count = 0 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }

    /// Flag a comment as reported with the reporter's feedback.
    pub async fn report(&self, id: Uuid, feedback: &str) -> Result<Comment, DbError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE comments
            SET reported = TRUE, feedback = $2
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(feedback)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("comment", id))
    }
}
