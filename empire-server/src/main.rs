//! Empire Server
//!
//! Control plane API host with event notifications.

use clap::Parser;
use empire_core::config::EventBackend;
use empire_core::processors::build_event_stream;
use empire_server::config::ConfigLoader;
use empire_server::server::{build_router, run_server};
use empire_server::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Empire - control plane API server
#[derive(Parser, Debug)]
#[command(name = "empire-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "EMPIRE_CONFIG", default_value = "./empire.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the events backend (null, log or webhook)
    #[arg(long, env = "EMPIRE_EVENTS_BACKEND")]
    events_backend: Option<EventBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting empire-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen, args.events_backend);
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Build the event stream; the async worker thread is started here
    let events = build_event_stream(&loaded_config.events).map_err(|e| {
        tracing::error!("Failed to configure event stream: {}", e);
        e
    })?;

    // Create application state
    let state = AppState::new(events, loaded_config.events.backend);

    // Build the router
    let router = build_router(state);

    // Run the server
    let listen_addr = loaded_config.server.listen;
    tracing::info!("Starting HTTP server on {}", listen_addr);
    run_server(router, listen_addr).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
