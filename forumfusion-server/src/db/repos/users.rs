//! User repository
//!
//! - register: INSERT ... ON CONFLICT (email) DO NOTHING, then fall back to
//!   the existing row (idempotent sign-up)
//! - badge/role changes are single UPDATE ... RETURNING statements

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{like_pattern, Badge, Email, Role};
use super::DbError;

/// User record
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    pub photo_url: Option<String>,
    pub badge: Badge,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    user_name: String,
    photo_url: Option<String>,
    badge: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |source| DbError::InvalidRow { resource: "user", source };
        Ok(Self {
            id: row.id,
            email: row.email,
            user_name: row.user_name,
            photo_url: row.photo_url,
            badge: Badge::parse(&row.badge).map_err(invalid)?,
            role: Role::parse(&row.role).map_err(invalid)?,
            created_at: row.created_at,
        })
    }
}

/// Fields supplied at sign-up
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub user_name: String,
    pub photo_url: Option<String>,
}

const USER_COLUMNS: &str = "id, email, user_name, photo_url, badge, role, created_at";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user with the bronze badge and user role.
    ///
    /// Returns the user and whether it was newly created. An existing
    /// email returns the stored user untouched.
    pub async fn register(&self, user: NewUser) -> Result<(User, bool), DbError> {
        let inserted: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (email, user_name, photo_url, badge, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email.as_str())
        .bind(&user.user_name)
        .bind(user.photo_url.as_deref())
        .bind(Badge::default().as_str())
        .bind(Role::default().as_str())
        .fetch_optional(self.pool)
        .await?;

        match inserted {
            Some(row) => Ok((row.try_into()?, true)),
            None => Ok((self.get_by_email(user.email.as_str()).await?, false)),
        }
    }

    /// List users, optionally filtered by a case-insensitive substring of
    /// the user name.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>, DbError> {
        let rows: Vec<UserRow> = match search {
            Some(term) => {
                sqlx::query_as(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE user_name ILIKE $1 ORDER BY created_at"
                ))
                .bind(like_pattern(term))
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.into_iter().map(User::try_from).collect()
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by email or fail with NotFound.
    pub async fn get_by_email(&self, email: &str) -> Result<User, DbError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| DbError::not_found("user", email))
    }

    /// Promote a user to admin.
    pub async fn make_admin(&self, id: Uuid) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(Role::Admin.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))?;

        row.try_into()
    }

    /// Set the membership badge for a user.
    pub async fn set_badge(&self, email: &str, badge: Badge) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(&format!(
            "UPDATE users SET badge = $2 WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email.to_lowercase())
        .bind(badge.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", email))?;

        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations");
        pool
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: Email::new(email).unwrap(),
            user_name: "Test User".into(),
            photo_url: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn register_is_idempotent() {
        let pool = pool().await;
        let repo = UserRepo::new(&pool);
        let email = format!("{}@example.com", Uuid::new_v4());

        let (first, created) = repo.register(new_user(&email)).await.unwrap();
        assert!(created);
        assert_eq!(first.badge, Badge::Bronze);
        assert_eq!(first.role, Role::User);

        let (second, created) = repo.register(new_user(&email)).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn badge_and_role_updates() {
        let pool = pool().await;
        let repo = UserRepo::new(&pool);
        let email = format!("{}@example.com", Uuid::new_v4());
        let (user, _) = repo.register(new_user(&email)).await.unwrap();

        let gold = repo.set_badge(&email, Badge::Gold).await.unwrap();
        assert_eq!(gold.badge, Badge::Gold);

        let admin = repo.make_admin(user.id).await.unwrap();
        assert!(admin.role.is_admin());

        let missing = repo.make_admin(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }
}
