//! revly-api - Property review aggregation service
//!
//! Pulls guest reviews from upstream sources (Hostaway, Google Places),
//! normalizes them into one canonical schema, and serves the filtered,
//! sorted, per-property aggregates the dashboard renders.

use anyhow::Result;
use clap::Parser;
use revly_api::{build_router, AppState};
use revly_common::config::Config;
use tracing::info;

/// Command-line arguments (highest-priority configuration tier)
#[derive(Debug, Parser)]
#[command(name = "revly-api", about = "Review aggregation HTTP service")]
struct Args {
    /// HTTP bind address (e.g. 127.0.0.1:5870)
    #[arg(long)]
    bind: Option<String>,

    /// Directory holding approvals.json and mock source data
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Revly Review API (revly-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(args.bind.as_deref(), args.data_dir.as_deref());

    info!("Data directory: {}", config.data_dir.display());
    if config.hostaway.is_some() {
        info!("Hostaway credentials configured (sandbox: {})", config.use_sandbox);
    } else {
        info!("No Hostaway credentials, serving mock review data");
    }
    if config.google_api_key.is_none() {
        info!("Google Places API key not configured, Google channel disabled");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("revly-api listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
