//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Handles conflicts via unique constraints (no check-then-insert)
//! - Uses transactions for multi-step operations
//! - Returns typed records; route modules shape the JSON

pub mod users;
pub mod posts;
pub mod comments;
pub mod tags;
pub mod announcements;
pub mod votes;
pub mod stats;

pub use users::{UserRepo, User, NewUser};
pub use posts::{PostRepo, Post, NewPost, FeedSort};
pub use comments::{CommentRepo, Comment, NewComment};
pub use tags::{TagRepo, Tag};
pub use announcements::{AnnouncementRepo, Announcement, NewAnnouncement};
pub use votes::{VoteRepo, Vote, VoteOutcome};
pub use stats::{StatsRepo, Totals};

use crate::models::ValidationError;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },

    #[error("invalid {resource} row: {source}")]
    InvalidRow {
        resource: &'static str,
        source: ValidationError,
    },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Turn a unique violation into `Conflict`, pass everything else through.
    pub(crate) fn on_unique(resource: &'static str, id: impl ToString) -> impl FnOnce(sqlx::Error) -> Self {
        let id = id.to_string();
        move |err| match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Self::Conflict { resource, id }
            }
            _ => Self::Sqlx(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_unique_passes_other_errors_through() {
        let err = DbError::on_unique("tag", "rust")(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn display() {
        let err = DbError::not_found("post", "abc");
        assert_eq!(err.to_string(), "not found: post 'abc'");
    }
}
