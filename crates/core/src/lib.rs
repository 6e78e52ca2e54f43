pub mod crew;
pub mod digest;
pub mod domain;
pub mod error;
pub mod llm;
pub mod news;
pub mod questionnaire;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_PROFILE_STORE_PATH: &str = "user_profiles.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub profile_store_path: PathBuf,
        pub anthropic_api_key: Option<String>,
        pub news_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let profile_store_path = std::env::var("PROFILE_STORE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_STORE_PATH.to_string());

            Ok(Self {
                profile_store_path: PathBuf::from(profile_store_path),
                anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
                news_api_key: std::env::var("NEWS_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn require_news_api_key(&self) -> anyhow::Result<&str> {
            self.news_api_key
                .as_deref()
                .context("NEWS_API_KEY is required")
        }
    }
}
