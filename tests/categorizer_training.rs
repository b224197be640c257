// tests/categorizer_training.rs
// File-based training data: TOML and JSON are both accepted, malformed
// input fails fast and leaves the prior model in place.

use std::fs;

use news_trend_curator::{Article, Categorizer, CuratorError, Sentiment};

fn article(title: &str, summary: &str) -> Article {
    Article {
        id: "test".into(),
        title: title.to_string(),
        summary: summary.to_string(),
        link: "https://news.example/x".into(),
        entities: vec![],
        sentiment: Sentiment::Neutral,
        category: None,
        published_at: 0,
    }
}

const TOML_DATA: &str = r#"
[[examples]]
text = "chip semiconductor cloud software compiler"
category = "technology"

[[examples]]
text = "election parliament senate minister ballot"
category = "politics"
"#;

const JSON_DATA: &str = r#"{
  "examples": [
    { "text": "striker goal league transfer", "category": "sports" },
    { "text": "chip semiconductor cloud", "category": "technology" }
  ]
}"#;

#[test]
fn trains_from_a_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.toml");
    fs::write(&path, TOML_DATA).unwrap();

    let categorizer = Categorizer::new();
    categorizer.train_from_file(&path).unwrap();

    assert_eq!(
        categorizer.classify(&article("New chip ships", "a faster semiconductor")),
        "technology"
    );
    assert_eq!(
        categorizer.classify(&article("Senate vote", "the minister spoke")),
        "politics"
    );
}

#[test]
fn trains_from_a_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.json");
    fs::write(&path, JSON_DATA).unwrap();

    let categorizer = Categorizer::new();
    categorizer.train_from_file(&path).unwrap();

    assert_eq!(
        categorizer.classify(&article("Striker scores again", "a late goal")),
        "sports"
    );
}

#[test]
fn a_bare_json_array_is_also_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.json");
    fs::write(
        &path,
        r#"[{ "text": "striker goal league", "category": "sports" }]"#,
    )
    .unwrap();

    let categorizer = Categorizer::new();
    categorizer.train_from_file(&path).unwrap();
    assert_eq!(categorizer.classify(&article("League goal", "")), "sports");
}

#[test]
fn malformed_file_fails_fast_and_keeps_the_prior_model() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.toml");
    fs::write(&good, TOML_DATA).unwrap();
    let bad = dir.path().join("bad.dat");
    fs::write(&bad, "not training data in any supported format").unwrap();

    let categorizer = Categorizer::new();
    categorizer.train_from_file(&good).unwrap();

    let err = categorizer.train_from_file(&bad).unwrap_err();
    assert!(matches!(err, CuratorError::Training(_)));

    // The model trained from the good file still answers.
    assert_eq!(
        categorizer.classify(&article("New chip ships", "")),
        "technology"
    );
}

#[test]
fn missing_file_surfaces_an_io_error() {
    let categorizer = Categorizer::new();
    let err = categorizer
        .train_from_file("does-not-exist.toml")
        .unwrap_err();
    assert!(matches!(err, CuratorError::Io(_)));
}
