//! Command implementations for the forumfusion CLI

use std::path::Path;

use anyhow::{Context, Result};
use forumfusion_server::ForumConfig;

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Load defaults, the config file and the environment.
fn load_config(path: Option<&Path>) -> Result<ForumConfig> {
    ForumConfig::load(path).context("Failed to load configuration")
}
