// src/acquire/mod.rs
pub mod providers;

use std::collections::HashSet;

use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use strsim::normalized_levenshtein;

use crate::types::{RawArticle, Result};

/// Titles at or above this similarity to an earlier batch member are
/// treated as near-duplicates and dropped.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.90;

/// One-time metrics registration (so series show up on a scrape).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "curator_acquired_total",
            "Raw articles returned by acquisition queries."
        );
        describe_counter!(
            "curator_acquire_errors_total",
            "Acquisition queries skipped due to provider errors."
        );
        describe_counter!(
            "curator_dedup_total",
            "Articles removed by normalization + deduplication."
        );
        describe_counter!(
            "curator_enrich_failures_total",
            "Articles dropped because enrichment failed."
        );
        describe_counter!(
            "curator_published_total",
            "Articles published into the feed catalog."
        );
        describe_counter!("curator_cycle_runs_total", "Completed ingestion cycles.");
        describe_gauge!(
            "curator_last_cycle_ts",
            "Unix ts when the last ingestion cycle completed."
        );
        describe_histogram!("curator_feed_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// One acquisition query, in one of the three supported modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AcquireQuery {
    Topic(String),
    Keywords(Vec<String>),
    Source(String),
}

impl AcquireQuery {
    /// Compact form for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Topic(topic) => format!("topic:{topic}"),
            Self::Keywords(keywords) => format!("keywords:{}", keywords.join(",")),
            Self::Source(source) => format!("source:{source}"),
        }
    }
}

/// Input to one ingestion cycle. Any subset of the three modes may be set;
/// an entirely empty request is valid and yields an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleRequest {
    pub topic: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub sources: Vec<String>,
}

impl CycleRequest {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Expand into concrete queries in the stable mode order
    /// topic -> keywords -> each named source (source-list order).
    pub fn queries(&self) -> Vec<AcquireQuery> {
        let mut out = Vec::new();
        if let Some(topic) = &self.topic {
            out.push(AcquireQuery::Topic(topic.clone()));
        }
        if let Some(keywords) = &self.keywords {
            if !keywords.is_empty() {
                out.push(AcquireQuery::Keywords(keywords.clone()));
            }
        }
        for source in &self.sources {
            out.push(AcquireQuery::Source(source.clone()));
        }
        out
    }
}

/// Acquisition collaborator. Implementations must return `Ok(vec![])` for
/// "no matches"; errors are reserved for queries that could not complete.
#[async_trait]
pub trait ArticleProvider: Send + Sync {
    async fn fetch(&self, query: &AcquireQuery) -> Result<Vec<RawArticle>>;
    fn name(&self) -> &str;
}

/// Run every query of the request against the provider, in request order.
/// A failed query is skipped with a warning; it never aborts the batch.
/// Returns the concatenated articles and the number of skipped queries.
pub async fn fetch_all(
    provider: &dyn ArticleProvider,
    request: &CycleRequest,
) -> (Vec<RawArticle>, usize) {
    ensure_metrics_described();

    let mut out = Vec::new();
    let mut failed = 0usize;
    for query in request.queries() {
        match provider.fetch(&query).await {
            Ok(mut batch) => {
                counter!("curator_acquired_total").increment(batch.len() as u64);
                out.append(&mut batch);
            }
            Err(e) => {
                failed += 1;
                counter!("curator_acquire_errors_total").increment(1);
                tracing::warn!(
                    error = %e,
                    query = %query.describe(),
                    provider = provider.name(),
                    "acquisition query failed"
                );
            }
        }
    }
    (out, failed)
}

/// Normalize text: collapse whitespace, trim, strip stray punctuation.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Strip trailing sentence punctuation (keep quotes)
    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    // 6) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Normalize a concatenated batch and drop duplicates: exact link repeats
/// first, then titles that are near-identical to an earlier batch member.
/// Returns the kept articles (input order) and the number dropped.
pub fn normalize_and_dedup(
    raw: Vec<RawArticle>,
    similarity_threshold: f64,
) -> (Vec<RawArticle>, usize) {
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut kept: Vec<RawArticle> = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for mut article in raw {
        article.title = normalize_text(&article.title);
        article.summary = normalize_text(&article.summary);

        if article.title.is_empty() || article.link.is_empty() {
            dropped += 1;
            continue;
        }
        if !seen_links.insert(article.link.clone()) {
            dropped += 1;
            continue;
        }

        let title = article.title.to_lowercase();
        let near_dup = kept
            .iter()
            .any(|k| normalized_levenshtein(&k.title.to_lowercase(), &title) >= similarity_threshold);
        if near_dup {
            dropped += 1;
            continue;
        }

        kept.push(article);
    }

    counter!("curator_dedup_total").increment(dropped as u64);
    (kept, dropped)
}
