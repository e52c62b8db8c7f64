//! Admin dashboard totals

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::{StatsRepo, Totals};
use crate::http::error::ApiError;
use crate::http::extractors::AdminUser;
use crate::http::server::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_users: i64,
}

impl From<Totals> for TotalsResponse {
    fn from(t: Totals) -> Self {
        Self {
            total_posts: t.total_posts,
            total_comments: t.total_comments,
            total_users: t.total_users,
        }
    }
}

/// GET /totalData (admin)
async fn totals(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<TotalsResponse>, ApiError> {
    let totals = StatsRepo::new(&state.pool).totals().await?;
    Ok(Json(TotalsResponse::from(totals)))
}

/// Stats routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/totalData", get(totals))
}
