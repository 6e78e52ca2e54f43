use crate::crew::agents::{
    news_curator_agent, relevance_scorer_agent, summarizer_agent, AgentPersona,
};
use crate::domain::profile::{ExperienceLevel, InvestmentFrequency, Profile};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBrief {
    pub description: String,
    pub expected_output: String,
    pub agent: AgentPersona,
}

fn time_context(frequency: InvestmentFrequency) -> &'static str {
    match frequency {
        InvestmentFrequency::Daily => "today's market movements and breaking news",
        InvestmentFrequency::Weekly => "this week's significant market developments",
        InvestmentFrequency::Monthly => "major market trends and developments this month",
        InvestmentFrequency::Quarterly => "significant quarterly developments and earnings",
        InvestmentFrequency::Yearly => "major annual trends and long-term market shifts",
    }
}

pub fn news_curation_task(profile: &Profile) -> TaskBrief {
    let sector_keywords = profile.industry_preferences.join(" OR ");

    TaskBrief {
        description: format!(
            "Fetch and curate financial news articles focusing on {sector_keywords} sectors. \
             Prioritize {} that align with {} investment strategy and {} risk tolerance. \
             Consider the user's {} experience level when selecting and presenting information. \
             Find 8-12 relevant articles.",
            time_context(profile.investment_frequency),
            profile.investment_horizon,
            profile.risk_appetite,
            profile.experience_level,
        ),
        expected_output: [
            "A curated list of 8-12 financial news articles with:",
            "- Article title and source",
            "- Brief description",
            "- Relevance score (1-10)",
            "- Key tags (sector, risk level, time relevance)",
        ]
        .join("\n"),
        agent: news_curator_agent(profile),
    }
}

pub fn summarization_task(profile: &Profile) -> TaskBrief {
    let summary_style = match profile.experience_level {
        ExperienceLevel::Beginner => {
            "Use simple language, explain technical terms, and provide context \
             for market concepts. Focus on what this means for a new investor."
        }
        ExperienceLevel::Expert => {
            "Use precise financial terminology, focus on technical analysis, \
             market implications, and advanced insights. Assume deep market knowledge."
        }
        ExperienceLevel::Intermediate | ExperienceLevel::Advanced => {
            "Balance technical accuracy with accessibility, explain key terms \
             when necessary, and focus on actionable insights."
        }
    };

    TaskBrief {
        description: format!(
            "Transform the curated news articles into 60-80 word summaries. {summary_style} \
             Highlight information most relevant to {} investors with {} risk tolerance. \
             Ensure each summary is standalone and actionable.",
            profile.investment_horizon, profile.risk_appetite,
        ),
        expected_output: [
            "For each article, provide:",
            "- 60-80 word summary",
            "- Key takeaway for the user's investment profile",
            "- Action items (if any)",
            "- Risk/opportunity indicators",
        ]
        .join("\n"),
        agent: summarizer_agent(),
    }
}

pub fn relevance_scoring_task(profile: &Profile) -> TaskBrief {
    TaskBrief {
        description: format!(
            "Score the relevance of each news article based on the user's profile:\n\
             - Industries: {}\n\
             - Investment horizon: {}\n\
             - Risk appetite: {}\n\
             - Experience level: {}\n\
             - Investment frequency: {}\n\
             Prioritize articles that best match these criteria.",
            profile.industry_preferences.join(", "),
            profile.investment_horizon,
            profile.risk_appetite,
            profile.experience_level,
            profile.investment_frequency,
        ),
        expected_output: [
            "A ranked list of articles with:",
            "- Relevance score (1-10)",
            "- Relevance reasoning",
            "- Priority level (High/Medium/Low)",
            "- Recommended action for this user type",
        ]
        .join("\n"),
        agent: relevance_scorer_agent(),
    }
}
