use crate::domain::digest::{DigestArticle, NewsDigest, Priority, MAX_DIGEST_ARTICLES};
use anyhow::{bail, ensure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Digest exactly as the model emits it, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmNewsDigest {
    pub articles: Vec<LlmDigestArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmDigestArticle {
    pub rank: u32,
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub key_takeaway: Option<String>,
    pub relevance_score: i64,
    pub priority: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LlmNewsDigest {
    pub fn validate_and_into_digest(
        self,
        user_id: &str,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<NewsDigest> {
        ensure!(
            (1..=MAX_DIGEST_ARTICLES).contains(&self.articles.len()),
            "LLM output must contain 1..={MAX_DIGEST_ARTICLES} articles (got {})",
            self.articles.len()
        );

        let count = self.articles.len() as u32;
        let mut seen_ranks = BTreeSet::<u32>::new();
        let mut articles = Vec::with_capacity(self.articles.len());
        for article in self.articles {
            articles.push(article.validate_and_into_article(count, &mut seen_ranks)?);
        }

        for rank in 1..=count {
            if !seen_ranks.contains(&rank) {
                bail!("missing rank {rank} in LLM output");
            }
        }
        articles.sort_by_key(|a| a.rank);

        Ok(NewsDigest {
            user_id: user_id.to_string(),
            generated_at,
            articles,
        })
    }
}

impl LlmDigestArticle {
    fn validate_and_into_article(
        self,
        count: u32,
        seen_ranks: &mut BTreeSet<u32>,
    ) -> anyhow::Result<DigestArticle> {
        ensure!(
            (1..=count).contains(&self.rank),
            "rank out of range: {}",
            self.rank
        );
        ensure!(seen_ranks.insert(self.rank), "duplicate rank: {}", self.rank);

        let title = self.title.trim().to_string();
        ensure!(!title.is_empty(), "title must be non-empty");

        let summary = self.summary.trim().to_string();
        ensure!(!summary.is_empty(), "summary must be non-empty");

        ensure!(
            (1..=10).contains(&self.relevance_score),
            "relevance_score must be between 1 and 10 (got {})",
            self.relevance_score
        );

        let priority = match self.priority.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            other => bail!("unknown priority: {other}"),
        };

        let source = self
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let url = self
            .url
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let key_takeaway = self
            .key_takeaway
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(DigestArticle {
            rank: self.rank,
            title,
            source,
            url,
            summary,
            key_takeaway,
            relevance_score: self.relevance_score as u8,
            priority,
            tags,
        })
    }
}
