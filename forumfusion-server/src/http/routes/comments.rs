//! Comment endpoints: add, list, clear and report

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{Comment, CommentRepo, NewComment};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Body, Email};

/// Add comment request. The commenter defaults to the session's user.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub comment: String,
    pub commenter_email: Option<String>,
    #[serde(default)]
    pub commenter_name: String,
    pub commenter_image: Option<String>,
}

#[derive(Deserialize)]
pub struct ReportRequest {
    pub feedback: String,
}

/// Comment response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: Option<String>,
    pub commenter_email: String,
    pub commenter_name: String,
    pub commenter_image: Option<String>,
    pub comment: String,
    pub feedback: Option<String>,
    pub reported: bool,
    pub comment_time: String,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            post_title: c.post_title,
            commenter_email: c.commenter_email,
            commenter_name: c.commenter_name,
            commenter_image: c.commenter_image,
            comment: c.comment,
            feedback: c.feedback,
            reported: c.reported,
            comment_time: c.comment_time.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

/// POST /comments/{id} - comment on post `id`
async fn create_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidUuid(post_id): ValidUuid,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let commenter_email = Email::new(req.commenter_email.as_deref().unwrap_or(user.email()))?;
    let comment = Body::new("comment", &req.comment)?;

    let comment = CommentRepo::new(&state.pool)
        .create(
            post_id,
            NewComment {
                commenter_email,
                commenter_name: req.commenter_name.trim().to_owned(),
                commenter_image: req.commenter_image,
                comment,
            },
        )
        .await?;

    tracing::info!(comment_id = %comment.id, %post_id, "comment added");
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// GET /comments/{id} - comments on post `id`, oldest first
async fn list_comments(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidUuid(post_id): ValidUuid,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = CommentRepo::new(&state.pool).list_for_post(post_id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// DELETE /deleteComments/{id} - all comments on post `id`
async fn delete_comments(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidUuid(post_id): ValidUuid,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted_count = CommentRepo::new(&state.pool).delete_for_post(post_id).await?;
    tracing::info!(%post_id, deleted_count, "comments cleared");
    Ok(Json(DeletedResponse { deleted_count }))
}

/// PUT /reports/{id} - report comment `id`
async fn report_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<ReportRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let feedback = Body::new("feedback", &req.feedback)?;
    let comment = CommentRepo::new(&state.pool)
        .report(id, feedback.as_str())
        .await?;

    tracing::info!(comment_id = %id, reporter = %user.email(), "comment reported");
    Ok(Json(CommentResponse::from(comment)))
}

/// Comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments/{id}", get(list_comments).post(create_comment))
        .route("/deleteComments/{id}", delete(delete_comments))
        .route("/reports/{id}", put(report_comment))
}
