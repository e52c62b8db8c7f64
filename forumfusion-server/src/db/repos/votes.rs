//! Vote repository
//!
//! One row per (post, voter) holds the voter's current state. Applying a
//! vote runs in a single transaction:
//! 1. lock the post row
//! 2. lock the voter's row (if any) and compute the transition
//! 3. adjust the post counters (never below zero)
//! 4. upsert the vote row
//!
//! Locking the post first serializes concurrent toggles on the same post,
//! including a voter's first vote where no vote row exists yet.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{VoteDirection, VoteState};
use super::DbError;

/// A voter's vote on a post
#[derive(Debug, Clone)]
pub struct Vote {
    pub id: Uuid,
    pub post_id: Uuid,
    pub voter_email: String,
    pub state: VoteState,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct VoteRow {
    id: Uuid,
    post_id: Uuid,
    voter_email: String,
    state: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = DbError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            post_id: row.post_id,
            voter_email: row.voter_email,
            state: VoteState::parse(&row.state)
                .map_err(|source| DbError::InvalidRow { resource: "vote", source })?,
            updated_at: row.updated_at,
        })
    }
}

/// Vote after a toggle, with the post's new counters
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub vote: Vote,
    pub up_vote: i32,
    pub down_vote: i32,
}

/// Vote repository
pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The voter's vote on a post.
    pub async fn get(&self, post_id: Uuid, voter: &str) -> Result<Vote, DbError> {
        let row: VoteRow = sqlx::query_as(
            r#"
            SELECT id, post_id, voter_email, state, updated_at
            FROM votes
            WHERE post_id = $1 AND voter_email = $2
            "#,
        )
        .bind(post_id)
        .bind(voter)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("vote", post_id))?;

        row.try_into()
    }

    /// Apply a vote toggle (atomic).
    pub async fn apply(
        &self,
        post_id: Uuid,
        voter: &str,
        direction: VoteDirection,
        active: bool,
    ) -> Result<VoteOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let counters: Option<(i32, i32)> =
            sqlx::query_as("SELECT up_vote, down_vote FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(counters) = counters else {
            return Err(DbError::not_found("post", post_id));
        };

        let current: Option<String> = sqlx::query_scalar(
            "SELECT state FROM votes WHERE post_id = $1 AND voter_email = $2 FOR UPDATE",
        )
        .bind(post_id)
        .bind(voter)
        .fetch_optional(&mut *tx)
        .await?;

        let current = match current {
            Some(state) => VoteState::parse(&state)
                .map_err(|source| DbError::InvalidRow { resource: "vote", source })?,
            None => VoteState::None,
        };
        let transition = current.apply(direction, active);

        // Repeated requests leave the counters untouched
        let (up_vote, down_vote) = if transition.is_noop() {
            counters
        } else {
            sqlx::query_as(
                r#"
                UPDATE posts
                SET up_vote = GREATEST(up_vote + $2, 0),
                    down_vote = GREATEST(down_vote + $3, 0)
                WHERE id = $1
                RETURNING up_vote, down_vote
                "#,
            )
            .bind(post_id)
            .bind(transition.up_delta)
            .bind(transition.down_delta)
            .fetch_one(&mut *tx)
            .await?
        };

        let row: VoteRow = sqlx::query_as(
            r#"
            INSERT INTO votes (post_id, voter_email, state)
            VALUES ($1, $2, $3)
            ON CONFLICT (post_id, voter_email)
            DO UPDATE SET state = EXCLUDED.state, updated_at = NOW()
            RETURNING id, post_id, voter_email, state, updated_at
            "#,
        )
        .bind(post_id)
        .bind(voter)
        .bind(transition.next.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            %post_id,
            from = current.as_str(),
            to = transition.next.as_str(),
            up_vote,
            down_vote,
            "vote applied"
        );

        Ok(VoteOutcome {
            vote: row.try_into()?,
            up_vote,
            down_vote,
        })
    }
}
