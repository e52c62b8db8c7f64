//! Announcement repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Body, Title};
use super::DbError;

/// Announcement record from database
#[derive(Debug, Clone, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub author_name: String,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    pub post_time: DateTime<Utc>,
}

/// Validated fields for a new announcement
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub author_name: String,
    pub author_image: Option<String>,
    pub title: Title,
    pub description: Body,
}

/// Announcement repository
pub struct AnnouncementRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AnnouncementRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement, DbError> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO announcements (author_name, author_image, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_name, author_image, title, description, post_time
            "#,
        )
        .bind(&announcement.author_name)
        .bind(announcement.author_image.as_deref())
        .bind(announcement.title.as_str())
        .bind(announcement.description.as_str())
        .fetch_one(self.pool)
        .await?;
        Ok(created)
    }

    /// All announcements, newest first.
    pub async fn list(&self) -> Result<Vec<Announcement>, DbError> {
        let announcements = sqlx::query_as(
            r#"
            SELECT id, author_name, author_image, title, description, post_time
            FROM announcements
            ORDER BY post_time DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(announcements)
    }
}
