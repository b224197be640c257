// src/acquire/providers/rss.rs
//! RSS-backed acquisition provider.
//!
//! Named sources map to feed endpoints (a live URL or a fixture string);
//! topic and keyword queries go through an optional search endpoint that
//! returns RSS (e.g., a news search feed taking a `q` parameter). A feed
//! with no items is an empty result, not an error.

use std::collections::HashMap;

use async_trait::async_trait;
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::acquire::{normalize_text, AcquireQuery, ArticleProvider};
use crate::types::{CuratorError, RawArticle, Result};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

fn parse_rfc2822_to_unix(ts: &str) -> u64 {
    chrono::DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

/// Parse RSS XML into raw articles. Items without a usable title or link
/// are skipped.
pub fn parse_rss(content: &str) -> Result<Vec<RawArticle>> {
    let t0 = std::time::Instant::now();

    let rss: Rss = from_str(content)?;
    let mut out = Vec::with_capacity(rss.channel.item.len());

    for it in rss.channel.item {
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        let link = it.link.unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        out.push(RawArticle {
            title,
            summary: normalize_text(it.description.as_deref().unwrap_or_default()),
            link,
            published_at: it
                .pub_date
                .as_deref()
                .map(parse_rfc2822_to_unix)
                .unwrap_or(0),
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("curator_feed_parse_ms").record(ms);

    Ok(out)
}

#[derive(Debug, Clone)]
enum Feed {
    Url(String),
    Fixture(String),
}

/// Provider over a set of configured RSS feeds.
pub struct RssProvider {
    feeds: HashMap<String, Feed>,
    search_url: Option<String>,
    client: reqwest::Client,
}

impl RssProvider {
    pub fn new() -> Self {
        Self {
            feeds: HashMap::new(),
            search_url: None,
            client: reqwest::Client::new(),
        }
    }

    /// Register a named source backed by a live feed URL.
    pub fn with_feed_url(mut self, source: impl Into<String>, url: impl Into<String>) -> Self {
        self.feeds.insert(source.into(), Feed::Url(url.into()));
        self
    }

    /// Register a named source backed by fixture XML (tests, offline runs).
    pub fn with_fixture(mut self, source: impl Into<String>, content: impl Into<String>) -> Self {
        self.feeds.insert(source.into(), Feed::Fixture(content.into()));
        self
    }

    /// Endpoint for topic/keyword queries; called with a `q` parameter and
    /// expected to return RSS.
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    async fn search(&self, term: &str) -> Result<Vec<RawArticle>> {
        let Some(base) = &self.search_url else {
            tracing::debug!(term, "no search endpoint configured; returning no matches");
            return Ok(Vec::new());
        };
        let body = self
            .client
            .get(base)
            .query(&[("q", term)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rss(&body)
    }
}

impl Default for RssProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleProvider for RssProvider {
    async fn fetch(&self, query: &AcquireQuery) -> Result<Vec<RawArticle>> {
        match query {
            AcquireQuery::Source(name) => match self.feeds.get(name) {
                Some(Feed::Fixture(content)) => parse_rss(content),
                Some(Feed::Url(url)) => {
                    let body = self
                        .client
                        .get(url)
                        .send()
                        .await?
                        .error_for_status()?
                        .text()
                        .await?;
                    parse_rss(&body)
                }
                None => Err(CuratorError::acquisition(
                    query.describe(),
                    "no feed configured for source",
                )),
            },
            AcquireQuery::Topic(term) => self.search(term).await,
            AcquireQuery::Keywords(terms) => self.search(&terms.join(" ")).await,
        }
    }

    fn name(&self) -> &str {
        "rss"
    }
}
