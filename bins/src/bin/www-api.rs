// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The Lectern www API
//!

use clap::Parser;
use lectern_crud::setup_database_at_path;
use lectern_www_api::{ApiConfig, prepare_api_router};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use std::path::PathBuf;

#[macro_use]
extern crate log;
extern crate simplelog;

/// Lectern www API entry point (serve the www JSON API)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("lectern")
        .build();
    CombinedLogger::init(vec![TermLogger::new(
        args.log_level,
        config_log,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    // File values first, then any flags passed
    let mut config = match &args.config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::default(),
    };
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(read_only) = args.read_only {
        config.read_only = read_only;
    }
    if let Some(max_connections) = args.max_connections {
        config.max_connections = max_connections;
    }

    serve(&config).await
}

/// Serve the API
async fn serve(config: &ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    // A read-only server can't create or migrate the database
    if !config.read_only {
        setup_database_at_path(&config.database_path).await?;
    }

    // Get the router
    let api_router = prepare_api_router(config).await?;

    // Bind the listener for new connections
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(
        "Serving {} ({}) on http://{}",
        config.database_path.to_string_lossy(),
        if config.read_only { "read-only" } else { "read-write" },
        config.bind_address
    );

    // Serve the server
    axum::serve(listener, api_router).await?;
    Ok(())
}

/// Lectern CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Lectern www API server",
    after_help = "Flags override the values in the config file"
)]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the database
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Address & port to serve on (e.g. 0.0.0.0:2408)
    #[arg(long)]
    pub bind: Option<String>,

    /// Whether only the GET routes are served
    ///
    /// Usage is `--read-only=<true/false>` rather than `--read-only`
    #[arg(long)]
    pub read_only: Option<bool>,

    /// Size of the database connection pool
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}
