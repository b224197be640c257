//! Demo that runs one ingestion cycle over a canned batch and prints the
//! personalized recommendations as JSON (stdout only; no network).

use std::collections::BTreeSet;

use news_trend_curator::acquire::providers::fixture::FixtureProvider;
use news_trend_curator::{
    AcquireQuery, CycleRequest, LexiconEnricher, NewsCurator, RawArticle, TrainingExample,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let provider = FixtureProvider::new("demo").with_batch(
        AcquireQuery::Topic("technology".into()),
        vec![
            RawArticle {
                title: "Chipmaker posts record earnings".into(),
                summary: "The semiconductor group reported record profits as cloud demand surged."
                    .into(),
                link: "https://news.example/chips".into(),
                published_at: 1_754_300_000,
            },
            RawArticle {
                title: "Parliament debates data privacy bill".into(),
                summary: "The senate committee heard testimony on the proposed ballot measure."
                    .into(),
                link: "https://news.example/privacy".into(),
                published_at: 1_754_310_000,
            },
            RawArticle {
                title: "Compiler release speeds up cloud builds".into(),
                summary: "The new compiler improves build times for large cloud software projects."
                    .into(),
                link: "https://news.example/compiler".into(),
                published_at: 1_754_320_000,
            },
        ],
    );

    let curator = NewsCurator::new(Box::new(provider), Box::new(LexiconEnricher::default()));
    curator.train_categorizer(&[
        TrainingExample {
            text: "chip semiconductor cloud software compiler".into(),
            category: "technology".into(),
        },
        TrainingExample {
            text: "election parliament senate minister ballot".into(),
            category: "politics".into(),
        },
    ])?;

    let report = curator.run_cycle(&CycleRequest::topic("technology")).await?;
    println!(
        "cycle: acquired={} published={} dropped={}",
        report.acquired,
        report.published,
        report.deduplicated + report.enrich_failures
    );

    for (keyword, count) in curator.trends().top_keywords(5) {
        println!("trend: {keyword} x{count}");
    }

    curator.set_preferences("1", BTreeSet::from(["technology".to_string()]));
    curator.receive_reward("1", 1.0);

    let recommended = curator.recommend("1");
    println!("{}", serde_json::to_string_pretty(&recommended)?);

    Ok(())
}
