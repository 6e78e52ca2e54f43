use crate::domain::profile::Profile;
use crate::news::provider::{NewsProvider, NewsQuery};
use crate::news::sectors::{matching_industries, sector_keywords};
use crate::news::types::NewsArticle;
use anyhow::Context;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// NewsAPI's `everything` endpoint only serves about a month of history.
pub const MAX_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Articles requested per industry query (NewsAPI caps page size at 100).
    pub per_sector_limit: u32,

    /// Upper bound on articles handed to the digest prompt.
    pub max_articles: usize,

    /// Only articles published this many days back (or later) are requested.
    pub lookback_days: i64,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            per_sector_limit: 8,
            max_articles: 24,
            lookback_days: 1,
        }
    }
}

impl FeedOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("FEED_PER_SECTOR_LIMIT") {
            if let Ok(n) = s.parse::<u32>() {
                out.per_sector_limit = n;
            }
        }

        if let Ok(s) = std::env::var("FEED_MAX_ARTICLES") {
            if let Ok(n) = s.parse::<usize>() {
                out.max_articles = n;
            }
        }

        if let Ok(s) = std::env::var("NEWS_LOOKBACK_DAYS") {
            if let Ok(n) = s.parse::<i64>() {
                out.lookback_days = n;
            }
        }

        out
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=100).contains(&self.per_sector_limit),
            "per-sector limit must be 1..=100 (got {})",
            self.per_sector_limit
        );
        anyhow::ensure!(self.max_articles >= 1, "max articles must be >= 1");
        anyhow::ensure!(
            (0..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days),
            "lookback days must be 0..={MAX_LOOKBACK_DAYS} (got {})",
            self.lookback_days
        );
        Ok(())
    }

    /// Earliest publication date to request.
    pub fn from_date(&self, today: NaiveDate) -> anyhow::Result<NaiveDate> {
        let days = u64::try_from(self.lookback_days)
            .with_context(|| format!("negative lookback days: {}", self.lookback_days))?;
        today
            .checked_sub_days(Days::new(days))
            .with_context(|| format!("lookback of {days} days from {today} is out of range"))
    }
}

/// One sector query per distinct industry preference, in preference order.
pub fn plan_queries(
    profile: &Profile,
    opts: &FeedOptions,
    today: NaiveDate,
) -> anyhow::Result<Vec<(String, NewsQuery)>> {
    opts.validate()?;
    let from = opts.from_date(today)?;

    let mut seen = HashSet::new();
    Ok(profile
        .industry_preferences
        .iter()
        .filter(|i| seen.insert(i.as_str()))
        .map(|industry| {
            (
                industry.clone(),
                NewsQuery {
                    keywords: Some(sector_keywords(industry).to_string()),
                    category: None,
                    limit: opts.per_sector_limit,
                    from,
                },
            )
        })
        .collect())
}

/// Fetches sector news for every preferred industry, dedups by URL and tags
/// each article with the profile industries it mentions.
pub async fn collect_articles(
    provider: &dyn NewsProvider,
    profile: &Profile,
    opts: &FeedOptions,
    today: NaiveDate,
) -> anyhow::Result<Vec<NewsArticle>> {
    let queries = plan_queries(profile, opts, today)?;

    let mut seen_urls = HashSet::new();
    let mut out = Vec::new();
    for (industry, query) in queries {
        let (articles, _raw) = provider
            .fetch_articles(&query)
            .await
            .with_context(|| format!("failed to fetch {industry} news"))?;

        let fetched = articles.len();
        for mut article in articles {
            let key = if article.url.is_empty() {
                article.title.clone()
            } else {
                article.url.clone()
            };
            if !seen_urls.insert(key) {
                continue;
            }

            let text = format!("{} {}", article.title, article.description);
            let mut tags: Vec<String> = matching_industries(&text, &profile.industry_preferences)
                .into_iter()
                .map(str::to_string)
                .collect();
            if !tags.contains(&industry) {
                tags.insert(0, industry.clone());
            }
            article.industries = tags;
            out.push(article);
        }

        tracing::debug!(
            user_id = %profile.user_id,
            %industry,
            fetched,
            provider = provider.provider_name(),
            "sector news fetched"
        );
    }

    if out.len() > opts.max_articles {
        tracing::debug!(
            user_id = %profile.user_id,
            kept = opts.max_articles,
            dropped = out.len() - opts.max_articles,
            "article list truncated"
        );
        out.truncate(opts.max_articles);
    }
    Ok(out)
}

/// Latest articles about one ticker symbol, at most `limit` of them.
pub async fn symbol_news(
    provider: &dyn NewsProvider,
    symbol: &str,
    limit: u32,
    opts: &FeedOptions,
    today: NaiveDate,
) -> anyhow::Result<Vec<NewsArticle>> {
    anyhow::ensure!(
        (1..=100).contains(&limit),
        "symbol news limit must be 1..=100 (got {limit})"
    );
    opts.validate()?;
    let query = NewsQuery::for_symbol(symbol, limit, opts.from_date(today)?)?;

    let (mut articles, _raw) = provider
        .fetch_articles(&query)
        .await
        .with_context(|| format!("failed to fetch news for {symbol}"))?;
    articles.truncate(limit as usize);

    tracing::debug!(
        %symbol,
        articles = articles.len(),
        provider = provider.provider_name(),
        "symbol news fetched"
    );
    Ok(articles)
}
