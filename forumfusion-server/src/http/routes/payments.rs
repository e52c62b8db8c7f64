//! Payment intent endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson};
use crate::http::server::AppState;
use crate::payments::amount_in_cents;

const CURRENCY: &str = "usd";

#[derive(Deserialize)]
pub struct PaymentIntentRequest {
    /// Price in dollars
    pub price: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// POST /createPaymentIntent
async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(req): ValidJson<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let amount = amount_in_cents(req.price)?;
    let provider = state.payments.as_ref().ok_or(ApiError::PaymentUnavailable)?;

    let intent = provider.create_intent(amount, CURRENCY).await?;
    tracing::info!(email = %user.email(), intent_id = %intent.id, amount, "payment intent issued");

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Payment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/createPaymentIntent", post(create_payment_intent))
}
