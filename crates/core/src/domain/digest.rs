use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_DIGEST_ARTICLES: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDigest {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub articles: Vec<DigestArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestArticle {
    pub rank: u32,
    pub title: String,
    pub source: String,
    pub url: Option<String>,
    pub summary: String,
    pub key_takeaway: Option<String>,
    pub relevance_score: u8,
    pub priority: Priority,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}
