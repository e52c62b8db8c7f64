//! Session endpoints: issue and clear the token cookie

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::Email;

/// Token request. Other profile fields the client sends are ignored.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// POST /jwt - sign a session token and set the cookie
async fn issue_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(req): ValidJson<TokenRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let email = Email::new(&req.email)?;
    let token = state.tokens.issue(email.as_str(), state.token_ttl)?;

    tracing::info!(email = %email.as_str(), "session issued");
    Ok((
        jar.add(state.cookies.session_cookie(token)),
        Json(SuccessResponse { success: true }),
    ))
}

/// POST /logout - expire the cookie
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    (
        jar.add(state.cookies.removal_cookie()),
        Json(SuccessResponse { success: true }),
    )
}

/// Session routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
}
