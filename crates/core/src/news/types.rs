use serde::{Deserialize, Serialize};

/// Article passed to the digest prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
    /// Profile industries the article mentions.
    #[serde(default)]
    pub industries: Vec<String>,
}

/// `GET /v2/everything` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct EverythingResponse {
    pub status: String,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawArticle {
    /// Articles without a title or description are useless to the digest and are dropped.
    pub fn into_article(self) -> Option<NewsArticle> {
        let title = self.title.filter(|s| !s.trim().is_empty())?;
        let description = self.description.filter(|s| !s.trim().is_empty())?;
        Some(NewsArticle {
            title,
            description,
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            industries: Vec::new(),
        })
    }
}
