//! wpg-ui - local web service for the post generator
//!
//! Binds to localhost only; there is no authentication and the logs assume
//! a single operator.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wpg_common::config::{RootFolderResolver, TomlConfig};
use wpg_common::Workspace;
use wpg_ui::{build_router, AppState};

/// Command-line arguments for wpg-ui
#[derive(Parser, Debug)]
#[command(name = "wpg-ui")]
#[command(about = "Web front end for the weekly post generator")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5790", env = "WPG_UI_PORT")]
    port: u16,

    /// Folder holding post_log.csv and analytics_log.csv
    #[arg(short, long, env = "WPG_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_error) = match TomlConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (TomlConfig::default(), Some(e)),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wpg_ui={0},wpg_common={0},tower_http=info", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wpg-ui v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        warn!("Ignoring config file, using defaults: {}", e);
    }

    let root_folder = RootFolderResolver::new(args.root_folder, &config).resolve();
    let workspace = Workspace::open(&root_folder, &config)
        .with_context(|| format!("Failed to open root folder {}", root_folder.display()))?;

    let app = build_router(AppState::new(workspace));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("wpg-ui listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
