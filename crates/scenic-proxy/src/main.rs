//! Scenic - resource proxy entry point
//!
//! Serves the paginated files/scenes API used by the scene viewer.

mod api;
mod config;
mod remote;
mod server;
mod state;
mod vertex;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "scenic")]
#[command(about = "Scene viewer resource proxy")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "scenic.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scenic v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;
    // Credentials from the environment win over the file
    config.apply_env();

    // Override bind address if specified
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    info!(
        base_url = %config.vertex.base_url,
        page_size = config.proxy.default_page_size,
        "Configuration loaded"
    );

    // Create application state
    let state = state::AppState::new(config.clone())?;
    // Run web server
    server::run(state, &config.server.bind, config.server.tls.as_ref()).await?;

    Ok(())
}
