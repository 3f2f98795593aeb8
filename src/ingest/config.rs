// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FeedError;
use crate::ingest::types::{FeedDescriptor, SourceKey};

const ENV_PATH: &str = "FEEDS_CONFIG_PATH";
const ENV_TIMEOUT: &str = "FEED_FETCH_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_user_agent() -> String {
    format!("feed-aggregator/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Static descriptor table, read-only after start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTable {
    feeds: Vec<FeedDescriptor>,
}

impl FeedTable {
    /// Validates: non-empty URLs, one descriptor per source key.
    pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, FeedError> {
        let mut seen = HashSet::new();
        let mut clean = Vec::with_capacity(feeds.len());
        for mut d in feeds {
            if d.feed_url.trim().is_empty() {
                return Err(FeedError::Configuration(format!(
                    "feed `{}` has an empty feed_url",
                    d.source_key
                )));
            }
            if !seen.insert(d.source_key) {
                return Err(FeedError::Configuration(format!(
                    "duplicate descriptor for source `{}`",
                    d.source_key
                )));
            }
            d.feed_url = d.feed_url.trim().to_string();
            d.comment_feed_base_url = d
                .comment_feed_base_url
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty());
            if d.display_name.trim().is_empty() {
                d.display_name = d.source_key.to_string();
            }
            clean.push(d);
        }
        Ok(Self { feeds: clean })
    }

    /// Built-in feeds: telegraph Atom, IT-news RSS, forum Atom with comment feeds.
    pub fn builtin() -> Self {
        Self {
            feeds: vec![
                FeedDescriptor::new(
                    SourceKey::FinancialTelegraph,
                    "https://feeds.crabpi.com/cls-telegraph",
                    "CLS Telegraph",
                ),
                FeedDescriptor::new(SourceKey::GenericRss, "https://www.ithome.com/rss/", "IT Home"),
                FeedDescriptor::new(SourceKey::Forum, "https://www.v2ex.com/index.xml", "V2EX")
                    .with_comment_feed("https://rss.lilydjwg.me/v2ex"),
            ],
        }
    }

    pub fn get(&self, key: SourceKey) -> Option<&FeedDescriptor> {
        self.feeds.iter().find(|d| d.source_key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedDescriptor> {
        self.feeds.iter()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FeedsConfig {
    pub table: FeedTable,
    pub fetch: FetchSettings,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            table: FeedTable::builtin(),
            fetch: FetchSettings::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    feeds: Option<Vec<FeedDescriptor>>,
    #[serde(default)]
    fetch: Option<FetchSettings>,
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<FeedsConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let raw = parse_raw(&content, ext.as_str())?;

    let table = match raw.feeds {
        Some(feeds) => FeedTable::new(feeds)?,
        None => FeedTable::builtin(),
    };
    Ok(FeedsConfig {
        table,
        fetch: raw.fetch.unwrap_or_default(),
    })
}

/// Load config using env var + fallbacks:
/// 1) $FEEDS_CONFIG_PATH
/// 2) config/feeds.toml
/// 3) config/feeds.json
/// 4) built-in defaults
///
/// `$FEED_FETCH_TIMEOUT_SECS` overrides the timeout in every case.
pub fn load_default() -> Result<FeedsConfig> {
    let mut cfg = load_file_default()?;
    if let Ok(v) = std::env::var(ENV_TIMEOUT) {
        cfg.fetch.timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("{ENV_TIMEOUT}={v:?} is not a number of seconds"))?;
    }
    Ok(cfg)
}

fn load_file_default() -> Result<FeedsConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/feeds.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/feeds.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(FeedsConfig::default())
}

fn parse_raw(s: &str, hint_ext: &str) -> Result<RawConfig> {
    if hint_ext == "json" || s.trim_start().starts_with('{') {
        return serde_json::from_str(s).context("parsing feeds config as json");
    }
    toml::from_str(s).context("parsing feeds config as toml")
}
