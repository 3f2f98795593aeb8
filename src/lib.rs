// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod render;
pub mod shell;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::FeedError;
pub use crate::ingest::types::{Article, Comment, FeedDescriptor, SourceKey};
pub use crate::notify::{HostNotifier, NoticeLog};
pub use crate::shell::FeedShell;

use std::sync::Arc;

use crate::ingest::config::FeedsConfig;
use crate::ingest::dispatch::AdapterRegistry;
use crate::ingest::fetch::HttpFetchClient;

/// Wire the default adapters, an HTTP fetch client and a notice log around `cfg`.
pub fn build_state(cfg: FeedsConfig) -> anyhow::Result<AppState> {
    let client = HttpFetchClient::new(&cfg.fetch)?;
    let notices = Arc::new(NoticeLog::default());
    let shell = FeedShell::new(
        cfg.table,
        AdapterRegistry::default(),
        Arc::new(client),
        notices.clone(),
    );
    tracing::info!(
        feeds = shell.table().len(),
        timeout_secs = cfg.fetch.timeout_secs,
        "feed shell ready"
    );
    Ok(AppState { shell, notices })
}
