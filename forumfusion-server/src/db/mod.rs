//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - Bounded connection pool shared through `AppState`
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations (comments, votes)

pub mod pool;
pub mod migrations;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
