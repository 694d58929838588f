use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use flashpoint_common::{FetchError, Origin};

const USER_AGENT: &str = "flashpoint/0.1";

/// One raw item as produced by an adapter, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// Origin-specific date string, parsed later by the normalizer.
    pub published: Option<String>,
}

/// A connector to one external news origin. Implementations enforce the
/// timeout themselves and never let a transport or parse error escape as
/// anything other than a `FetchError`.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn origin(&self) -> Origin;

    /// Keyword set for the relevance filter. Empty means the origin is
    /// already scoped upstream and everything is retained.
    fn keywords(&self) -> &[String];

    async fn fetch(&self, timeout: Duration) -> Result<Vec<RawRecord>, FetchError>;
}

// --- GDELT (structured JSON API) ---

#[derive(Debug, Deserialize)]
struct GdeltResponse {
    #[serde(default)]
    articles: Vec<GdeltArticle>,
}

#[derive(Debug, Deserialize)]
struct GdeltArticle {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    seendate: Option<String>,
}

pub struct GdeltAdapter {
    client: reqwest::Client,
    endpoint: String,
    keywords: Vec<String>,
    max_items: usize,
}

impl GdeltAdapter {
    pub fn new(client: reqwest::Client, endpoint: &str, max_items: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            keywords: Vec::new(),
            max_items,
        }
    }
}

/// Map a GDELT article list JSON body into raw records, dropping entries
/// without a title or URL.
fn records_from_gdelt(body: &str, max_items: usize) -> Result<Vec<RawRecord>, serde_json::Error> {
    let data: GdeltResponse = serde_json::from_str(body)?;
    Ok(data
        .articles
        .into_iter()
        .filter(|a| !a.title.is_empty() && !a.url.is_empty())
        .take(max_items)
        .map(|a| RawRecord {
            title: a.title,
            url: a.url,
            description: None,
            published: a.seendate,
        })
        .collect())
}

#[async_trait]
impl SourceAdapter for GdeltAdapter {
    fn origin(&self) -> Origin {
        Origin::Gdelt
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }

    async fn fetch(&self, timeout: Duration) -> Result<Vec<RawRecord>, FetchError> {
        let origin = self.origin();
        let request = async {
            let resp = self
                .client
                .get(&self.endpoint)
                .header("User-Agent", USER_AGENT)
                .send()
                .await
                .map_err(|e| FetchError::network(origin, e.to_string()))?;
            let body = resp
                .text()
                .await
                .map_err(|e| FetchError::network(origin, e.to_string()))?;
            records_from_gdelt(&body, self.max_items)
                .map_err(|e| FetchError::parse(origin, e.to_string()))
        };

        let records = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| FetchError::timeout(origin))??;

        info!(origin = %origin, items = records.len(), "Fetched JSON feed");
        Ok(records)
    }
}

// --- Syndication XML (RSS) ---

/// Scan syndication XML for `<item>` regions and pull out title, link,
/// pubDate and description by first match. Tolerant by design: feeds vary
/// in escaping, so the title is accepted either CDATA-wrapped or as an
/// escaped literal, and any missing field other than title/link is kept
/// as None rather than rejecting the item.
pub fn scan_rss_items(xml: &str) -> Vec<RawRecord> {
    let item_re = Regex::new(r"(?s)<item[^>]*>(.*?)</item>").expect("valid regex");
    let title_re = Regex::new(r"(?s)<title><!\[CDATA\[(.*?)\]\]></title>|<title>(.*?)</title>")
        .expect("valid regex");
    let link_re = Regex::new(r"(?s)<link>(.*?)</link>").expect("valid regex");
    let date_re = Regex::new(r"(?s)<pubDate>(.*?)</pubDate>").expect("valid regex");
    let desc_re = Regex::new(
        r"(?s)<description>(?:<!\[CDATA\[(.*?)\]\]>|(.*?))</description>",
    )
    .expect("valid regex");

    let mut records = Vec::new();
    for item in item_re.captures_iter(xml) {
        let body = &item[1];

        let title = title_re
            .captures(body)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().trim().to_string());
        let link = link_re
            .captures(body)
            .map(|c| c[1].trim().to_string())
            .filter(|l| !l.is_empty());

        let (Some(title), Some(url)) = (title, link) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let published = date_re.captures(body).map(|c| c[1].trim().to_string());
        let description = desc_re
            .captures(body)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().trim().to_string())
            .filter(|d| !d.is_empty());

        records.push(RawRecord {
            title,
            url,
            description,
            published,
        });
    }
    records
}

pub struct RssAdapter {
    client: reqwest::Client,
    origin: Origin,
    endpoint: String,
    keywords: Vec<String>,
    max_items: usize,
}

impl RssAdapter {
    pub fn new(
        client: reqwest::Client,
        origin: Origin,
        endpoint: &str,
        keywords: Vec<String>,
        max_items: usize,
    ) -> Self {
        Self {
            client,
            origin,
            endpoint: endpoint.to_string(),
            keywords,
            max_items,
        }
    }
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    fn origin(&self) -> Origin {
        self.origin
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }

    async fn fetch(&self, timeout: Duration) -> Result<Vec<RawRecord>, FetchError> {
        let origin = self.origin;
        let request = async {
            let resp = self
                .client
                .get(&self.endpoint)
                .header("User-Agent", USER_AGENT)
                .send()
                .await
                .map_err(|e| FetchError::network(origin, e.to_string()))?;
            resp.text()
                .await
                .map_err(|e| FetchError::network(origin, e.to_string()))
        };

        let xml = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| FetchError::timeout(origin))??;

        let mut records = scan_rss_items(&xml);
        records.truncate(self.max_items);

        info!(origin = %origin, items = records.len(), "Fetched RSS feed");
        Ok(records)
    }
}
