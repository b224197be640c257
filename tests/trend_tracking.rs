// tests/trend_tracking.rs
// Trend accumulation across cycles on the public surface. The §-level
// detail (tokenization, stop words, heuristic independence) lives in the
// trends module's unit tests; this covers batching behavior end to end.

use news_trend_curator::acquire::providers::fixture::FixtureProvider;
use news_trend_curator::{
    AcquireQuery, CycleRequest, LexiconEnricher, NewsCurator, RawArticle, Sentiment,
};

fn raw(title: &str, summary: &str, link: &str) -> RawArticle {
    RawArticle {
        title: title.to_string(),
        summary: summary.to_string(),
        link: link.to_string(),
        published_at: 0,
    }
}

fn curator() -> NewsCurator {
    let provider = FixtureProvider::new("canned")
        .with_batch(
            AcquireQuery::Topic("first".into()),
            vec![
                raw(
                    "Kubernetes release lands",
                    "Operators report a strong rally in adoption.",
                    "https://news.example/k1",
                ),
                raw(
                    "Kubernetes adoption expands",
                    "Clusters everywhere.",
                    "https://news.example/k2",
                ),
            ],
        )
        .with_batch(
            AcquireQuery::Topic("second".into()),
            vec![raw(
                "Kubernetes security advisory issued",
                "A crash loop hits older clusters.",
                "https://news.example/k3",
            )],
        );
    NewsCurator::new(Box::new(provider), Box::new(LexiconEnricher::default()))
}

#[tokio::test]
async fn frequencies_sum_across_cycles_regardless_of_batching() {
    let curator = curator();
    curator.run_cycle(&CycleRequest::topic("first")).await.unwrap();
    curator.run_cycle(&CycleRequest::topic("second")).await.unwrap();

    // Three articles mention the keyword across two cycles.
    assert_eq!(curator.trends().frequency_of("kubernetes"), 3);
}

#[tokio::test]
async fn sentiment_history_appends_in_processing_order() {
    let curator = curator();
    curator.run_cycle(&CycleRequest::topic("first")).await.unwrap();
    curator.run_cycle(&CycleRequest::topic("second")).await.unwrap();

    let history = curator.trends().sentiment_history_of("kubernetes");
    assert_eq!(history.len(), 3);
    // "strong rally" reads positive, "crash" negative to the local
    // heuristic; the middle article has no scored words.
    assert_eq!(
        history,
        vec![Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
    );
}

#[tokio::test]
async fn catalog_replacement_does_not_reset_trends() {
    let curator = curator();
    curator.run_cycle(&CycleRequest::topic("first")).await.unwrap();
    assert_eq!(curator.trends().frequency_of("kubernetes"), 2);

    // The second cycle replaces the catalog wholesale...
    curator.run_cycle(&CycleRequest::topic("second")).await.unwrap();
    assert_eq!(curator.catalog().len(), 1);
    // ...but the trend store is cumulative.
    assert_eq!(curator.trends().frequency_of("kubernetes"), 3);
    assert_eq!(curator.trends().frequency_of("release"), 1);
}
