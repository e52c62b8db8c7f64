//! forumfusion - run and maintain the Forum Fusion API server
//!
//! - `serve`: migrate the schema, then serve the HTTP API until Ctrl+C/SIGTERM
//! - `migrate`: apply the schema and exit

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "forumfusion",
    author,
    version,
    about = "Forum Fusion API server",
    long_about = "JSON API for the Forum Fusion community board: users, posts, comments, \
                  tags, announcements and votes on Postgres, with cookie sessions and \
                  Stripe payment intents."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file (default: ~/.forumfusion/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, cli.config.as_deref()).await,
        Commands::Migrate(args) => commands::run_migrate(args, cli.config.as_deref()).await,
    };

    tracing_setup::shutdown_otel();
    result
}
