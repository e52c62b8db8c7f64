//! Axum server setup
//!
//! Server skeleton with:
//! - CORS for the configured frontend origins, credentials allowed
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::auth::{CookiePolicy, TokenKeys};
use crate::config::ForumConfig;
use crate::payments::{PaymentError, PaymentProvider, StripeClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenKeys,
    pub cookies: CookiePolicy,
    pub token_ttl: chrono::Duration,
    /// `None` when no payment provider is configured
    pub payments: Option<Arc<dyn PaymentProvider>>,
}

impl AppState {
    /// Build state from config. Payments use Stripe when a key is set.
    pub fn from_config(pool: PgPool, config: &ForumConfig) -> Result<Self, ServerError> {
        let payments = match &config.stripe_secret_key {
            Some(key) => {
                let client = StripeClient::new(key.clone(), config.stripe_api_base.clone())?;
                Some(Arc::new(client) as Arc<dyn PaymentProvider>)
            }
            None => None,
        };

        Ok(Self {
            pool,
            tokens: TokenKeys::new(&config.token_secret),
            cookies: CookiePolicy::for_environment(config.environment),
            token_ttl: chrono::Duration::days(config.token_ttl_days),
            payments,
        })
    }
}

/// All API routes with request tracing. CORS is added by `run_server`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::payments::router())
        .merge(routes::users::router())
        .merge(routes::posts::router())
        .merge(routes::comments::router())
        .merge(routes::tags::router())
        .merge(routes::announcements::router())
        .merge(routes::votes::router())
        .merge(routes::stats::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// CORS for the given origins with credentials (the session cookie) allowed.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let config = ForumConfig::load(None)?;
/// let pool = create_pool(&config.database_url).await?;
/// run_server(pool, &config).await?;
/// ```
pub async fn run_server(pool: PgPool, config: &ForumConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(pool, config)?;
    if state.payments.is_none() {
        tracing::warn!("STRIPE_SECRET_KEY not set, payment intents disabled");
    }

    let cors = cors_layer(&config.cors_origins)?;
    tracing::info!(origins = ?config.cors_origins, environment = ?config.environment, "CORS configured");

    let app = build_router(state).layer(cors);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("payment client setup failed: {0}")]
    Payments(#[from] PaymentError),
}
