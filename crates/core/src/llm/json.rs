use crate::domain::contract::LlmNewsDigest;
use crate::domain::digest::NewsDigest;
use anyhow::Context;
use chrono::{DateTime, Utc};

/// Pulls a JSON object out of model text: fenced code block first, then the
/// outermost pair of braces.
pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let mut inner = trimmed;
        if let Some(after_first) = inner.split_once('\n').map(|(_, rest)| rest) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

pub fn parse_digest(
    text: &str,
    user_id: &str,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<NewsDigest> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    let parsed = serde_json::from_str::<LlmNewsDigest>(&json_str)
        .with_context(|| format!("LLM output is not valid JSON for digest schema: {json_str}"))?;
    parsed.validate_and_into_digest(user_id, generated_at)
}
