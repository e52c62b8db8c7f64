//! Site-wide totals for the admin dashboard

use sqlx::{FromRow, PgPool};

use super::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Totals {
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_users: i64,
}

pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn totals(&self) -> Result<Totals, DbError> {
        let totals = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts) as total_posts,
                (SELECT COUNT(*) FROM comments) as total_comments,
                (SELECT COUNT(*) FROM users) as total_users
            "#,
        )
        .fetch_one(self.pool)
        .await?;
        Ok(totals)
    }
}
