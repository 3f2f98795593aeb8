use feed_aggregator::ingest::comments::{comment_feed_url, fetch_comments};
use feed_aggregator::ingest::config::FeedTable;
use feed_aggregator::ingest::fetch::FixtureFetchClient;
use feed_aggregator::{FeedDescriptor, FeedError, SourceKey};

const COMMENTS_XML: &str = include_str!("fixtures/forum_comments.xml");
const EMPTY_XML: &str = include_str!("fixtures/forum_comments_empty.xml");

fn forum_table() -> FeedTable {
    FeedTable::new(vec![FeedDescriptor::new(
        SourceKey::Forum,
        "https://forum.example.com/index.xml",
        "Forum",
    )
    .with_comment_feed("https://comments.example.com/forum/")])
    .expect("valid table")
}

#[test]
fn comment_url_joins_base_and_id() {
    let url = comment_feed_url(&forum_table(), "123456").unwrap();
    assert_eq!(url, "https://comments.example.com/forum/123456");
}

#[tokio::test]
async fn comments_map_author_and_content() {
    let client = FixtureFetchClient::new()
        .with("https://comments.example.com/forum/123456", COMMENTS_XML);
    let comments = fetch_comments(&client, &forum_table(), Some("123456"))
        .await
        .expect("comments ok");

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author, "erin");
    assert_eq!(comments[0].content, "<p>Get one with 32GB RAM.</p>");
    assert_eq!(comments[1].author, "frank");
    assert_eq!(comments[1].title, "#2");
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn feed_without_items_means_no_comments_yet() {
    let client = FixtureFetchClient::new()
        .with("https://comments.example.com/forum/123457", EMPTY_XML);
    let comments = fetch_comments(&client, &forum_table(), Some("123457"))
        .await
        .expect("no items is not an error");
    assert!(comments.is_empty());
}

#[tokio::test]
async fn absent_id_is_free() {
    let client = FixtureFetchClient::new();
    let comments = fetch_comments(&client, &forum_table(), None).await.unwrap();
    assert!(comments.is_empty());
    assert!(client.calls().is_empty(), "no I/O for absent external id");
}

#[tokio::test]
async fn malformed_comment_feed_is_an_error() {
    let client = FixtureFetchClient::new()
        .with("https://comments.example.com/forum/9", "<rss><channel>");
    let err = fetch_comments(&client, &forum_table(), Some("9")).await.unwrap_err();
    assert!(matches!(err, FeedError::MalformedXml(_)));
}

#[tokio::test]
async fn missing_forum_descriptor_is_configuration_error() {
    let table = FeedTable::new(vec![FeedDescriptor::new(
        SourceKey::GenericRss,
        "https://news.example.com/rss",
        "News",
    )])
    .unwrap();
    let client = FixtureFetchClient::new();
    let err = fetch_comments(&client, &table, Some("1")).await.unwrap_err();
    assert!(matches!(err, FeedError::Configuration(_)));
}
