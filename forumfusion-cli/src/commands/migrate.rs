//! Schema migration command

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use forumfusion_server::db::{create_pool, migrations};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Apply all migrations and exit
pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let database_url = args
        .database_url
        .filter(|url| !url.trim().is_empty())
        .or(Some(config.database_url).filter(|url| !url.trim().is_empty()))
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, or the config file")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("✅ Schema is up to date");
    Ok(())
}
