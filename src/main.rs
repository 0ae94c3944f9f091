//! spa-edge entry point.
//!
//! Serves a single-page application's build output and accepts client-side
//! telemetry. There are no command-line arguments: the port (5100) and all
//! other settings are compiled-in defaults, optionally overridden by a TOML
//! file named in `SPA_EDGE_CONFIG`.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spa_edge_common::EdgeConfig;
use spa_edge_server::EdgeServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spa_edge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting spa-edge");

    let config = EdgeConfig::from_env().context("Failed to load configuration")?;

    info!(
        port = config.server.port,
        dist_dir = %config.site.dist_dir.display(),
        "Configuration loaded"
    );

    let server = EdgeServer::new(&config).context("Failed to initialize server")?;

    info!("Server initialized. Routes:");
    info!("  POST /telemetry   - Telemetry intake (rate limited)");
    info!("  GET  /assets/*    - Static build artifacts (immutable cache)");
    info!("  GET  /*           - SPA fallback document");

    // A bind failure propagates here and exits the process non-zero.
    server.run().await?;

    Ok(())
}
