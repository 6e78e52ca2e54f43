//! Profile to news digest: fetch sector news, brief the crew, ask the LLM.

use crate::crew::NewsCrew;
use crate::domain::digest::NewsDigest;
use crate::domain::profile::Profile;
use crate::llm::{DigestInput, LlmClient};
use crate::news::feed::{collect_articles, FeedOptions};
use crate::news::provider::NewsProvider;
use chrono::NaiveDate;

pub async fn generate_digest(
    profile: Profile,
    news: &dyn NewsProvider,
    llm: &dyn LlmClient,
    opts: &FeedOptions,
    today: NaiveDate,
) -> anyhow::Result<NewsDigest> {
    let articles = collect_articles(news, &profile, opts, today).await?;
    let user_id = profile.user_id.clone();
    tracing::info!(
        %user_id,
        articles = articles.len(),
        provider = llm.provider().as_str(),
        "generating news digest"
    );

    let input = DigestInput::try_new(NewsCrew::new(profile), articles)?;
    let digest = llm.generate_digest(input).await?;

    tracing::info!(%user_id, articles = digest.articles.len(), "news digest generated");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digest::{DigestArticle, Priority};
    use crate::domain::profile::{
        ExperienceLevel, InvestmentFrequency, InvestmentHorizon, RiskAppetite,
    };
    use crate::llm::Provider;
    use crate::news::provider::NewsQuery;
    use crate::news::types::NewsArticle;
    use serde_json::Value;

    struct OneArticle;

    #[async_trait::async_trait]
    impl NewsProvider for OneArticle {
        fn provider_name(&self) -> &'static str {
            "one"
        }

        async fn fetch_articles(
            &self,
            _query: &NewsQuery,
        ) -> anyhow::Result<(Vec<NewsArticle>, Value)> {
            Ok((
                vec![NewsArticle {
                    title: "Biotech merger announced".to_string(),
                    description: "Two drug makers combine.".to_string(),
                    url: "https://example.com/m".to_string(),
                    published_at: "2026-03-01T10:00:00Z".to_string(),
                    source: "AP".to_string(),
                    industries: Vec::new(),
                }],
                Value::Null,
            ))
        }
    }

    struct NoArticles;

    #[async_trait::async_trait]
    impl NewsProvider for NoArticles {
        fn provider_name(&self) -> &'static str {
            "none"
        }

        async fn fetch_articles(
            &self,
            _query: &NewsQuery,
        ) -> anyhow::Result<(Vec<NewsArticle>, Value)> {
            Ok((Vec::new(), Value::Null))
        }
    }

    /// Echoes each input article back as a digest entry.
    struct EchoLlm;

    #[async_trait::async_trait]
    impl LlmClient for EchoLlm {
        fn provider(&self) -> Provider {
            Provider::Anthropic
        }

        async fn generate_digest(&self, input: DigestInput) -> anyhow::Result<NewsDigest> {
            Ok(NewsDigest {
                user_id: input.user_id().to_string(),
                generated_at: input.generated_at,
                articles: input
                    .articles
                    .iter()
                    .enumerate()
                    .map(|(i, a)| DigestArticle {
                        rank: i as u32 + 1,
                        title: a.title.clone(),
                        source: a.source.clone(),
                        url: Some(a.url.clone()),
                        summary: a.description.clone(),
                        key_takeaway: None,
                        relevance_score: 5,
                        priority: Priority::Medium,
                        tags: a.industries.clone(),
                    })
                    .collect(),
            })
        }
    }

    fn profile() -> Profile {
        Profile {
            user_id: "u7".to_string(),
            investment_frequency: InvestmentFrequency::Daily,
            industry_preferences: vec!["healthcare".to_string()],
            investment_horizon: InvestmentHorizon::LongTerm,
            investment_period: "10 years".to_string(),
            risk_appetite: RiskAppetite::Medium,
            experience_level: ExperienceLevel::Advanced,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[tokio::test]
    async fn runs_feed_then_llm() {
        let opts = FeedOptions::default();
        let digest = generate_digest(profile(), &OneArticle, &EchoLlm, &opts, today())
            .await
            .unwrap();
        assert_eq!(digest.user_id, "u7");
        assert_eq!(digest.articles.len(), 1);
        assert_eq!(digest.articles[0].tags, vec!["healthcare"]);
    }

    #[tokio::test]
    async fn no_articles_is_an_error() {
        let opts = FeedOptions::default();
        let res = generate_digest(profile(), &NoArticles, &EchoLlm, &opts, today()).await;
        assert!(res.is_err());
    }
}
