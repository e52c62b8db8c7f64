//! Payment intent creation
//!
//! Only intent creation is supported; the client confirms the payment with
//! the returned client secret. `StripeClient` talks to the Stripe REST API
//! directly over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Largest amount the provider accepts, in cents.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999;

/// Upper bound on a single provider call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Payment errors
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: &'static str },
}

/// Created payment intent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates payment intents
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_intent(&self, amount_cents: i64, currency: &str) -> Result<PaymentIntent, PaymentError>;
}

/// Convert a price in major units to cents, rounding to the nearest cent.
///
/// # Example
/// ```
/// use forumfusion_server::payments::amount_in_cents;
///
/// assert_eq!(amount_in_cents(19.99).unwrap(), 1999);
/// assert!(amount_in_cents(0.0).is_err());
/// ```
pub fn amount_in_cents(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() {
        return Err(PaymentError::InvalidAmount { reason: "price must be a finite number" });
    }

    let cents = (price * 100.0).round();
    if cents < 1.0 {
        return Err(PaymentError::InvalidAmount { reason: "price must be at least one cent" });
    }
    if cents > MAX_AMOUNT_CENTS as f64 {
        return Err(PaymentError::InvalidAmount { reason: "price exceeds the maximum charge" });
    }

    Ok(cents as i64)
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Stripe REST client
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    /// Create a client for `base_url` (normally `https://api.stripe.com`).
    pub fn new(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        Self::with_timeout(secret_key, base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_intent(&self, amount_cents: i64, currency: &str) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let amount = amount_cents.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ProviderErrorBody>(&text) {
                Ok(body) => body.error.message,
                // Truncate so provider internals don't flood the logs
                Err(_) => text.chars().take(500).collect(),
            };
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response.json().await?;
        tracing::info!(intent_id = %intent.id, amount_cents, currency, "payment intent created");
        Ok(intent)
    }
}
