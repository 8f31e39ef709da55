//! Mini TTL Cache demo
//!
//! Reads an artificially slow computation through the cache once per second
//! and logs whether each read was served from the cache.

use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_ttl_cache::{Cache, Config};

const REPORT_KEY: &str = "report";

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and arm its trim timer
/// 4. Read through the cache until Ctrl+C / SIGTERM
/// 5. Disarm the trim timer and exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::try_from_env().context("loading configuration")?;
    info!(
        "Configuration loaded: trim_interval={}s, default_ttl={}s",
        config.trim_interval, config.default_ttl
    );

    let cache = Cache::from_config(&config).context("creating cache")?;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = cache
                    .through(REPORT_KEY, build_report, config.default_ttl)
                    .await;
                let stats = cache.stats();
                info!(
                    report = %report,
                    hits = stats.hits,
                    misses = stats.misses,
                    entries = stats.total_entries,
                    "Read report"
                );
            }
            _ = &mut shutdown => break,
        }
    }

    // Release the trim task before the runtime goes away
    cache.set_trim_interval(0.0)?;
    info!("Shutdown complete");
    Ok(())
}

/// Stands in for an expensive computation.
async fn build_report() -> String {
    info!("Building report (slow)");
    tokio::time::sleep(Duration::from_millis(500)).await;
    format!("report built at {}", chrono::Utc::now().to_rfc3339())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
