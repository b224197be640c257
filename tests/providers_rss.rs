// tests/providers_rss.rs
// RSS provider against fixture XML (no network): parsing, normalization,
// and behavior as the acquisition collaborator of a full cycle.

use news_trend_curator::acquire::providers::rss::{parse_rss, RssProvider};
use news_trend_curator::{AcquireQuery, ArticleProvider, CycleRequest, LexiconEnricher, NewsCurator};

const WIRE_XML: &str = include_str!("fixtures/wire_rss.xml");

#[test]
fn fixture_feed_parses_normalized_articles() {
    let out = parse_rss(WIRE_XML).unwrap();
    assert_eq!(out.len(), 2); // the untitled item is skipped

    assert_eq!(
        out[0].title,
        "Markets rally as chipmaker posts record profits"
    );
    assert_eq!(out[0].link, "https://wire.example/markets-rally");
    // Tags stripped, entities decoded, typographic quotes folded.
    assert_eq!(
        out[0].summary,
        "Shares of the semiconductor group \"surged\" after earnings beat expectations"
    );
    assert!(out[0].published_at > 1_754_000_000);
    assert!(out[1].published_at > out[0].published_at);
}

#[tokio::test]
async fn provider_serves_named_sources_from_fixtures() {
    let provider = RssProvider::new().with_fixture("wire", WIRE_XML);
    let out = provider
        .fetch(&AcquireQuery::Source("wire".into()))
        .await
        .unwrap();
    assert_eq!(out.len(), 2);
}

#[tokio::test]
async fn unconfigured_source_is_skipped_by_the_cycle() {
    let provider = RssProvider::new().with_fixture("wire", WIRE_XML);
    let curator = NewsCurator::new(Box::new(provider), Box::new(LexiconEnricher::default()));

    let request = CycleRequest::default().with_sources(["wire", "not-configured"]);
    let report = curator.run_cycle(&request).await.unwrap();

    assert_eq!(report.queries_failed, 1);
    assert_eq!(report.published, 2);

    // Articles got enriched signals on the way in.
    let snapshot = curator.catalog().snapshot();
    assert!(snapshot
        .iter()
        .any(|article| !article.entities.is_empty()));
}
