//! Tag endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{Tag, TagRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidJson};
use crate::http::server::AppState;
use crate::models::TagName;

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// POST /tags (admin)
async fn create_tag(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidJson(req): ValidJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let name = TagName::new(&req.name)?;
    let tag = TagRepo::new(&state.pool).create(name).await?;
    tracing::info!(tag = %tag.name, "tag created");
    Ok((StatusCode::CREATED, Json(TagResponse::from(tag))))
}

/// GET /tags
async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = TagRepo::new(&state.pool).list().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Tag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tags", get(list_tags).post(create_tag))
}
