//! Feed aggregator service binary entrypoint.
//! Boots the Axum HTTP server over the feed host shell.

use feed_aggregator::ingest::config;
use feed_aggregator::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs for local runs, enabled by FEED_DEV_LOG=1.
/// Shuttle may already own the global subscriber, so a failed init is ignored.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FEED_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed_aggregator=debug,ingest=info,notify=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    // Recorder first so series descriptions land in it.
    let metrics = Metrics::init()?;

    let cfg = config::load_default()?;
    let state = feed_aggregator::build_state(cfg)?;
    let router = feed_aggregator::router(state).merge(metrics.router());

    Ok(router.into())
}
