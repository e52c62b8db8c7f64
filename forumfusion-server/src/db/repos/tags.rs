//! Tag repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::TagName;
use super::DbError;

/// Tag record from database
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a tag. A duplicate name is a `Conflict`.
    pub async fn create(&self, name: TagName) -> Result<Tag, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on_unique("tag", name.as_str()))
    }

    /// All tags, by name.
    pub async fn list(&self) -> Result<Vec<Tag>, DbError> {
        let tags = sqlx::query_as("SELECT id, name, created_at FROM tags ORDER BY name")
            .fetch_all(self.pool)
            .await?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_tag_conflicts() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = TagRepo::new(&pool);
        let name = format!("tag-{}", Uuid::new_v4().simple());

        repo.create(TagName::new(&name).unwrap()).await.unwrap();
        let err = repo.create(TagName::new(&name).unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { resource: "tag", .. }));

        assert!(repo.list().await.unwrap().iter().any(|t| t.name == name));
    }
}
