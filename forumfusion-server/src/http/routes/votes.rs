//! Vote endpoints
//!
//! The voter is always the session's user; `voterEmail`/`voteId` in the
//! request body are accepted for compatibility and ignored.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{Vote, VoteOutcome, VoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{ValidationError, VoteDirection, VoteState};

/// Vote toggle request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub post_id: Uuid,
    /// Button pressed
    pub vote: VoteDirection,
    /// Desired state of the up button (read when `vote = "up"`)
    pub up_vote: Option<bool>,
    /// Desired state of the down button (read when `vote = "down"`)
    pub down_vote: Option<bool>,
}

impl VoteRequest {
    /// Whether the pressed direction should end up selected.
    pub fn active(&self) -> Result<bool, ValidationError> {
        match self.vote {
            VoteDirection::Up => self.up_vote.ok_or(ValidationError::Empty { field: "upVote" }),
            VoteDirection::Down => self
                .down_vote
                .ok_or(ValidationError::Empty { field: "downVote" }),
        }
    }
}

/// A voter's vote record
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post_id: Uuid,
    pub voter_email: String,
    pub vote: VoteState,
    pub up_vote: bool,
    pub down_vote: bool,
    pub updated_at: String,
}

impl From<Vote> for VoteResponse {
    fn from(v: Vote) -> Self {
        Self {
            id: v.id,
            post_id: v.post_id,
            voter_email: v.voter_email,
            vote: v.state,
            up_vote: v.state == VoteState::Up,
            down_vote: v.state == VoteState::Down,
            updated_at: v.updated_at.to_rfc3339(),
        }
    }
}

/// Vote plus the post's counters after the toggle
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdateResponse {
    pub vote: VoteResponse,
    pub up_vote: i32,
    pub down_vote: i32,
}

impl From<VoteOutcome> for VoteUpdateResponse {
    fn from(o: VoteOutcome) -> Self {
        Self {
            vote: VoteResponse::from(o.vote),
            up_vote: o.up_vote,
            down_vote: o.down_vote,
        }
    }
}

/// GET /getVote/{postId} - the caller's vote on a post
async fn get_vote(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidUuid(post_id): ValidUuid,
) -> Result<Json<VoteResponse>, ApiError> {
    let vote = VoteRepo::new(&state.pool).get(post_id, user.email()).await?;
    Ok(Json(VoteResponse::from(vote)))
}

/// PUT /updateVotes - toggle the caller's vote
async fn update_votes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(req): ValidJson<VoteRequest>,
) -> Result<Json<VoteUpdateResponse>, ApiError> {
    let active = req.active()?;
    let outcome = VoteRepo::new(&state.pool)
        .apply(req.post_id, user.email(), req.vote, active)
        .await?;

    tracing::info!(
        post_id = %req.post_id,
        voter = %user.email(),
        state = outcome.vote.state.as_str(),
        "vote updated"
    );
    Ok(Json(VoteUpdateResponse::from(outcome)))
}

/// Vote routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getVote/{postId}", get(get_vote))
        .route("/updateVotes", put(update_votes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ignores_client_voter_fields() {
        let req: VoteRequest = serde_json::from_str(
            r#"{
                "postId": "6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e",
                "vote": "down",
                "upVote": false,
                "downVote": true,
                "voterEmail": "someone-else@example.com",
                "voteId": "abc"
            }"#,
        )
        .unwrap();
        assert_eq!(req.vote, VoteDirection::Down);
        assert!(req.active().unwrap());
    }

    #[test]
    fn pressed_flag_is_required() {
        let req: VoteRequest = serde_json::from_str(
            r#"{"postId": "6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e", "vote": "up", "downVote": true}"#,
        )
        .unwrap();
        assert!(matches!(
            req.active(),
            Err(ValidationError::Empty { field: "upVote" })
        ));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let parsed = serde_json::from_str::<VoteRequest>(
            r#"{"postId": "6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e", "vote": "sideways", "upVote": true}"#,
        );
        assert!(parsed.is_err());
    }
}
