//! forumfusion-server: JSON API for the Forum Fusion community board
//!
//! Users, posts, comments, tags, announcements and per-user votes on
//! Postgres, with cookie-borne session tokens and payment intents for the
//! gold membership badge.
//!
//! # Layout
//!
//! - `models` - validated input types and the vote state machine
//! - `db` - connection pool, migrations, repositories
//! - `auth` - session tokens and cookie policy
//! - `payments` - payment provider seam and Stripe client
//! - `http` - axum router, extractors, error mapping
//! - `config` - layered server configuration

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod payments;

pub use config::{ConfigError, Environment, ForumConfig};
pub use http::{build_router, run_server, AppState, ServerError};
