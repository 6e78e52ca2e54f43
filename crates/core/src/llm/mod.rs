pub mod anthropic;
pub mod error;
pub mod json;

use crate::crew::NewsCrew;
use crate::domain::digest::NewsDigest;
use crate::news::types::NewsArticle;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DigestInput {
    pub crew: NewsCrew,
    pub articles: Vec<NewsArticle>,
    pub generated_at: DateTime<Utc>,
}

impl DigestInput {
    pub fn try_new(crew: NewsCrew, articles: Vec<NewsArticle>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !articles.is_empty(),
            "no news articles available for user {}",
            crew.profile().user_id
        );
        Ok(Self {
            crew,
            articles,
            generated_at: Utc::now(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.crew.profile().user_id
    }

    pub fn articles_json(&self) -> String {
        serde_json::to_string_pretty(&self.articles).unwrap_or_else(|_| "[]".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate_digest(&self, input: DigestInput) -> anyhow::Result<NewsDigest>;
}
