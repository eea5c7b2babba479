use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use tasting_proxy::config::load_config;
use tasting_proxy::lifecycle::shutdown_signal;
use tasting_proxy::observability::{logging, metrics};
use tasting_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "tasting-proxy")]
#[command(about = "Storefront tasting-notes proxy", long_about = None)]
struct Cli {
    /// Path to a TOML config file (env vars still override).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging("tasting_proxy=debug,tower_http=debug");

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tasting-proxy starting");

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        shop = %config.shopify.shop,
        api_version = %config.shopify.api_version,
        allowed_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
