//! Announcement endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{Announcement, AnnouncementRepo, NewAnnouncement};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidJson};
use crate::http::server::AppState;
use crate::models::{Body, Title};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    #[serde(default)]
    pub author_name: String,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub author_name: String,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    pub post_time: String,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            author_name: a.author_name,
            author_image: a.author_image,
            title: a.title,
            description: a.description,
            post_time: a.post_time.to_rfc3339(),
        }
    }
}

/// POST /makeAnnouncement (admin)
async fn create_announcement(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidJson(req): ValidJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    let title = Title::new(&req.title)?;
    let description = Body::new("description", &req.description)?;

    let announcement = AnnouncementRepo::new(&state.pool)
        .create(NewAnnouncement {
            author_name: req.author_name.trim().to_owned(),
            author_image: req.author_image,
            title,
            description,
        })
        .await?;

    tracing::info!(announcement_id = %announcement.id, by = %admin.email, "announcement published");
    Ok((StatusCode::CREATED, Json(AnnouncementResponse::from(announcement))))
}

/// GET /announcements - newest first
async fn list_announcements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    let announcements = AnnouncementRepo::new(&state.pool).list().await?;
    Ok(Json(
        announcements.into_iter().map(AnnouncementResponse::from).collect(),
    ))
}

/// Announcement routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/makeAnnouncement", post(create_announcement))
        .route("/announcements", get(list_announcements))
}
