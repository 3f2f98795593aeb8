// src/ingest/fetch.rs
//! Fetch client collaborator: a single GET per call, no retries.

use async_trait::async_trait;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::FeedError;
use crate::ingest::config::FetchSettings;

#[async_trait]
pub trait FetchClient: Send + Sync {
    /// GET `url` and return the body as text. Transport failures and non-2xx
    /// responses come back as `FeedError::Fetch`.
    async fn get(&self, url: &str) -> Result<String, FeedError>;
}

pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl HttpFetchClient {
    pub fn new(settings: &FetchSettings) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FeedError::Configuration(format!("building http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn get(&self, url: &str) -> Result<String, FeedError> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, %url, "feed http error");
                counter!("feed_fetch_errors_total").increment(1);
                return Err(FeedError::fetch(url, e));
            }
        };
        let resp = resp.error_for_status().map_err(|e| {
            counter!("feed_fetch_errors_total").increment(1);
            FeedError::fetch(url, e)
        })?;
        resp.text().await.map_err(|e| FeedError::fetch(url, e))
    }
}

/// Serves canned bodies by URL; unknown URLs fail like a 404.
///
/// For tests and offline runs only; the service wires [`HttpFetchClient`].
#[derive(Default)]
pub struct FixtureFetchClient {
    bodies: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FixtureFetchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(g) => g.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }
}

#[async_trait]
impl FetchClient for FixtureFetchClient {
    async fn get(&self, url: &str) -> Result<String, FeedError> {
        match self.calls.lock() {
            Ok(mut g) => g.push(url.to_string()),
            Err(poison) => poison.into_inner().push(url.to_string()),
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FeedError::fetch(url, "404 Not Found (no fixture)"))
    }
}
