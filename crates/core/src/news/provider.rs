use crate::news::types::{EverythingResponse, NewsArticle};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const EVERYTHING_PATH: &str = "/v2/everything";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const MARKET_TERMS: &str = "stock OR market OR finance OR investment";
const DEFAULT_QUERY: &str = "finance OR stock OR market OR investment";

/// Articles requested for a single ticker unless the caller asks otherwise.
pub const DEFAULT_SYMBOL_NEWS_LIMIT: u32 = 5;
const MAX_SYMBOL_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub keywords: Option<String>,
    pub category: Option<String>,
    pub limit: u32,
    pub from: NaiveDate,
}

impl NewsQuery {
    /// Free-text query: keywords narrowed to market news, optionally ANDed with a category.
    pub fn q(&self) -> String {
        let mut q = match self.keywords.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(keywords) => format!("{keywords} AND ({MARKET_TERMS})"),
            None => DEFAULT_QUERY.to_string(),
        };
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            q.push_str(&format!(" AND {category}"));
        }
        q
    }

    /// News about one listed company, searched by its quoted ticker.
    pub fn for_symbol(symbol: &str, limit: u32, from: NaiveDate) -> Result<Self> {
        let symbol = normalize_symbol(symbol)?;
        Ok(Self {
            keywords: Some(format!("\"{symbol}\"")),
            category: None,
            limit,
            from,
        })
    }
}

/// Upper-cases a ticker such as `aapl` or `brk.b` and rejects anything that
/// is not letters, digits, `.` or `-`.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    anyhow::ensure!(!symbol.is_empty(), "stock symbol must not be empty");
    anyhow::ensure!(
        symbol.len() <= MAX_SYMBOL_LEN,
        "stock symbol is too long: {symbol}"
    );
    anyhow::ensure!(
        symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'),
        "invalid stock symbol: {symbol}"
    );
    Ok(symbol)
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_articles(&self, query: &NewsQuery) -> Result<(Vec<NewsArticle>, Value)>;
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn from_settings(settings: &crate::config::Settings) -> Result<Self> {
        let api_key = settings.require_news_api_key()?.to_string();
        let base_url =
            std::env::var("NEWS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("NEWS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build news api http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EVERYTHING_PATH)
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    fn provider_name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_articles(&self, query: &NewsQuery) -> Result<(Vec<NewsArticle>, Value)> {
        let res = self
            .http
            .get(self.url())
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query.q()),
                ("language", "en".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", query.limit.to_string()),
                ("from", query.from.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .context("news api request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read news api response")?;
        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("news api response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("news api HTTP {status}: {raw_json}");
        }

        let articles = parse_articles(raw_json.clone())?;
        Ok((articles, raw_json))
    }
}

pub fn parse_articles(raw_json: Value) -> Result<Vec<NewsArticle>> {
    let parsed = serde_json::from_value::<EverythingResponse>(raw_json)
        .context("failed to parse news api response")?;
    anyhow::ensure!(
        parsed.status == "ok",
        "news api returned status={}: {}",
        parsed.status,
        parsed.message.unwrap_or_default()
    );

    let total = parsed.articles.len();
    let articles: Vec<NewsArticle> = parsed
        .articles
        .into_iter()
        .filter_map(|a| a.into_article())
        .collect();
    if articles.len() < total {
        tracing::debug!(
            dropped = total - articles.len(),
            "skipped articles without title or description"
        );
    }
    Ok(articles)
}
