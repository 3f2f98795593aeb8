//! One-shot probe: fetch one feed, print its list, then the first detail view.

use std::sync::Arc;

use clap::Parser;
use feed_aggregator::ingest::config;
use feed_aggregator::ingest::dispatch::AdapterRegistry;
use feed_aggregator::ingest::fetch::HttpFetchClient;
use feed_aggregator::render::list_label;
use feed_aggregator::{FeedShell, NoticeLog, SourceKey};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Source key: financial-telegraph | generic-rss | forum
    #[arg(value_parser = parse_key)]
    source: SourceKey,

    /// Index of the article to open after listing
    #[arg(short, long, default_value_t = 0)]
    open: usize,

    /// Override the fetch timeout in seconds
    #[arg(long, env = "FEED_FETCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

fn parse_key(s: &str) -> Result<SourceKey, String> {
    SourceKey::parse(s).ok_or_else(|| format!("unknown source key `{s}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt().with_env_filter(filter).with_target(false).init();

    let args = Cli::parse();
    let mut cfg = config::load_default()?;
    if let Some(secs) = args.timeout_secs {
        cfg.fetch.timeout_secs = secs;
    }

    let notices = Arc::new(NoticeLog::default());
    let shell = FeedShell::new(
        cfg.table,
        AdapterRegistry::default(),
        Arc::new(HttpFetchClient::new(&cfg.fetch)?),
        notices.clone(),
    );

    let articles = shell.refresh(args.source).await;
    for (i, a) in articles.iter().enumerate() {
        println!("{i:>3}  {}", list_label(a));
    }

    match articles.get(args.open) {
        Some(article) => println!("\n{}", shell.open(article).await),
        None => println!("\n(no article at index {})", args.open),
    }

    for n in notices.errors() {
        eprintln!("error: {n}");
    }
    Ok(())
}
