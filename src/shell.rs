// src/shell.rs
//! Reference host shell: owns the per-source article cache and turns pipeline
//! failures into notices instead of errors.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::FeedError;
use crate::ingest::comments::fetch_comments;
use crate::ingest::config::FeedTable;
use crate::ingest::dispatch::{failure_notice, AdapterRegistry};
use crate::ingest::fetch::FetchClient;
use crate::ingest::types::{Article, Comment, FeedDescriptor, SourceKey};
use crate::ingest::{ensure_metrics_described, fetch_feed};
use crate::notify::HostNotifier;
use crate::render::render_detail;

#[derive(Clone)]
pub struct FeedShell {
    table: Arc<FeedTable>,
    registry: Arc<AdapterRegistry>,
    client: Arc<dyn FetchClient>,
    notifier: Arc<dyn HostNotifier>,
    // Only `refresh` writes, and only by swapping a whole source's list.
    cache: Arc<RwLock<HashMap<SourceKey, Arc<Vec<Article>>>>>,
}

impl FeedShell {
    pub fn new(
        table: FeedTable,
        registry: AdapterRegistry,
        client: Arc<dyn FetchClient>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            table: Arc::new(table),
            registry: Arc::new(registry),
            client,
            notifier,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn table(&self) -> &FeedTable {
        &self.table
    }

    pub fn descriptor(&self, key: SourceKey) -> Option<&FeedDescriptor> {
        self.table.get(key)
    }

    /// Fetch and adapt one source, then replace its cached list.
    ///
    /// Any failure is reported once through the notifier and the previous
    /// list stays in place. Returns the list now cached.
    pub async fn refresh(&self, key: SourceKey) -> Arc<Vec<Article>> {
        let Some(descriptor) = self.table.get(key) else {
            self.notifier
                .notify_error(&format!("No feed configured for source `{key}`"));
            return self.articles(key);
        };

        match fetch_feed(self.client.as_ref(), &self.registry, descriptor).await {
            Ok(articles) => {
                let count = articles.len();
                let fresh = Arc::new(articles);
                self.replace(key, fresh.clone());
                self.notifier
                    .notify_info(&format!("Loaded {count} articles from {}", descriptor.display_name));
                fresh
            }
            Err(e) => {
                self.report(descriptor, &e);
                self.articles(key)
            }
        }
    }

    fn report(&self, descriptor: &FeedDescriptor, e: &FeedError) {
        tracing::warn!(source = %descriptor.source_key, kind = e.kind(), error = %e, "refresh failed");
        self.notifier.notify_error(&failure_notice(descriptor, e));
    }

    fn replace(&self, key: SourceKey, articles: Arc<Vec<Article>>) {
        let mut guard = match self.cache.write() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard.insert(key, articles);
    }

    /// Latest cached list for `key` (empty before the first refresh).
    pub fn articles(&self, key: SourceKey) -> Arc<Vec<Article>> {
        let guard = match self.cache.read() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard.get(&key).cloned().unwrap_or_default()
    }

    pub fn article(&self, key: SourceKey, index: usize) -> Option<Article> {
        self.articles(key).get(index).cloned()
    }

    /// Comments for one article; `None` if the fetch failed (already notified).
    pub async fn comments_for(&self, article: &Article) -> Option<Vec<Comment>> {
        match fetch_comments(
            self.client.as_ref(),
            &self.table,
            article.external_id.as_deref(),
        )
        .await
        {
            Ok(comments) => Some(comments),
            Err(e) => {
                tracing::warn!(id = %article.id, kind = e.kind(), error = %e, "comment fetch failed");
                let msg = match &e {
                    FeedError::Configuration(_) => format!("Configuration problem: {e}"),
                    _ => format!("Failed to load comments: {e}"),
                };
                self.notifier.notify_error(&msg);
                None
            }
        }
    }

    /// Rendered detail view. Forum articles get their comments fetched on
    /// demand; a failed comment fetch still renders the article body.
    pub async fn open(&self, article: &Article) -> String {
        let comments = if article.wants_comments() {
            self.comments_for(article).await
        } else {
            None
        };
        render_detail(article, comments.as_deref())
    }
}
