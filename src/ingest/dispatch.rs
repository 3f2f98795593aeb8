// src/ingest/dispatch.rs
//! Routes a descriptor + raw payload to the adapter registered for its source.

use metrics::{counter, histogram};
use std::collections::HashMap;

use crate::error::FeedError;
use crate::ingest::providers::{
    FeedAdapter, ForumAtomAdapter, GenericRssAdapter, TelegraphAtomAdapter,
};
use crate::ingest::types::{Article, FeedDescriptor, SourceKey};
use crate::ingest::xml::normalize;
use crate::notify::HostNotifier;

pub struct AdapterRegistry {
    adapters: HashMap<SourceKey, Box<dyn FeedAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::empty()
            .register(TelegraphAtomAdapter)
            .register(GenericRssAdapter)
            .register(ForumAtomAdapter)
    }
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Adds (or replaces) the adapter for its own source key.
    pub fn register<A: FeedAdapter + 'static>(mut self, adapter: A) -> Self {
        self.adapters.insert(adapter.source_key(), Box::new(adapter));
        self
    }

    pub fn get(&self, key: SourceKey) -> Option<&dyn FeedAdapter> {
        self.adapters.get(&key).map(|a| a.as_ref())
    }

    /// `adapt(normalize(raw_xml))` for the descriptor's source.
    pub fn dispatch(
        &self,
        descriptor: &FeedDescriptor,
        raw_xml: &str,
    ) -> Result<Vec<Article>, FeedError> {
        let adapter = self
            .get(descriptor.source_key)
            .ok_or_else(|| FeedError::UnknownSource(descriptor.source_key.to_string()))?;

        let t0 = std::time::Instant::now();
        let doc = normalize(raw_xml)?;
        let articles = adapter.adapt(&doc)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_parse_ms").record(ms);
        counter!("feed_articles_total").increment(articles.len() as u64);
        Ok(articles)
    }

    /// [`dispatch`](Self::dispatch) for host callers that already hold the raw
    /// payload and keep no cache: structural failures are surfaced once through
    /// `notifier` and degrade to an empty list. `FeedShell::refresh` reports
    /// with the same [`failure_notice`] wording but keeps its previous list.
    pub fn dispatch_or_warn(
        &self,
        descriptor: &FeedDescriptor,
        raw_xml: &str,
        notifier: &dyn HostNotifier,
    ) -> Vec<Article> {
        match self.dispatch(descriptor, raw_xml) {
            Ok(articles) => articles,
            Err(e) => {
                counter!("feed_adapt_errors_total").increment(1);
                tracing::warn!(
                    source = %descriptor.source_key,
                    kind = e.kind(),
                    error = %e,
                    "feed dispatch failed"
                );
                notifier.notify_error(&failure_notice(descriptor, &e));
                Vec::new()
            }
        }
    }
}

/// User-facing wording for a failed fetch or dispatch of `descriptor`.
pub fn failure_notice(descriptor: &FeedDescriptor, e: &FeedError) -> String {
    match e {
        FeedError::Configuration(_) => format!("Configuration problem: {e}"),
        e if e.is_recoverable() => {
            format!("Failed to parse {} feed: {e}", descriptor.display_name)
        }
        _ => format!("Failed to fetch {}: {e}", descriptor.display_name),
    }
}
