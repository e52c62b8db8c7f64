//! HTTP server command
//!
//! Flags override the config file and environment.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use forumfusion_server::db::{create_pool_with_options, migrations};
use forumfusion_server::{run_server, Environment, ForumConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:5000, or PORT)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Production cookies (Secure, SameSite=None)
    #[arg(long)]
    pub production: bool,

    /// Allowed CORS origin (repeatable; replaces configured origins)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Skip schema migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut ForumConfig) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(url) = self.database_url.as_ref().filter(|url| !url.trim().is_empty()) {
            config.database_url = url.clone();
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if self.production {
            config.environment = Environment::Production;
        }
        if !self.cors_origins.is_empty() {
            config.cors_origins = self.cors_origins.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        bind = %config.bind_addr,
        environment = ?config.environment,
        "Starting forumfusion server"
    );

    let pool = create_pool_with_options(&config.database_url, config.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    // Run server (blocks until shutdown)
    run_server(pool, &config).await.context("Server error")?;

    Ok(())
}
