//! The news crew: agent personas and task briefs derived from a [`Profile`].
//!
//! These are prompt parameters only. Execution happens in an
//! [`LlmClient`](crate::llm::LlmClient), which receives the crew as part of
//! its input.

pub mod agents;
pub mod tasks;

use crate::domain::profile::Profile;
use agents::AgentPersona;
use serde::Serialize;
use tasks::TaskBrief;

#[derive(Debug, Clone, Serialize)]
pub struct NewsCrew {
    profile: Profile,
    agents: Vec<AgentPersona>,
    tasks: Vec<TaskBrief>,
}

impl NewsCrew {
    pub fn new(profile: Profile) -> Self {
        let agents = vec![
            agents::news_curator_agent(&profile),
            agents::summarizer_agent(),
            agents::relevance_scorer_agent(),
        ];
        let tasks = vec![
            tasks::news_curation_task(&profile),
            tasks::summarization_task(&profile),
            tasks::relevance_scoring_task(&profile),
        ];
        Self {
            profile,
            agents,
            tasks,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Agents in execution order: curator, summarizer, relevance scorer.
    pub fn agents(&self) -> &[AgentPersona] {
        &self.agents
    }

    /// Tasks in execution order; each carries the agent that performs it.
    pub fn tasks(&self) -> &[TaskBrief] {
        &self.tasks
    }

    /// Rebuilds every agent and task for a changed profile.
    pub fn update_user_profile(&mut self, profile: Profile) {
        *self = Self::new(profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{
        ExperienceLevel, InvestmentFrequency, InvestmentHorizon, RiskAppetite,
    };

    fn profile(experience: ExperienceLevel) -> Profile {
        Profile {
            user_id: "u1".to_string(),
            investment_frequency: InvestmentFrequency::Daily,
            industry_preferences: vec!["technology".to_string(), "finance".to_string()],
            investment_horizon: InvestmentHorizon::LongTerm,
            investment_period: "5 years".to_string(),
            risk_appetite: RiskAppetite::Medium,
            experience_level: experience,
        }
    }

    #[test]
    fn curator_role_follows_experience_level() {
        let roles: Vec<_> = [
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
            ExperienceLevel::Expert,
        ]
        .into_iter()
        .map(|e| NewsCrew::new(profile(e)).agents()[0].role.clone())
        .collect();
        assert_eq!(
            roles,
            vec![
                "Beginner-Friendly Financial News Curator",
                "Personalized Financial News Curator",
                "Personalized Financial News Curator",
                "Expert Financial News Analyst",
            ]
        );
    }

    #[test]
    fn curator_goal_mentions_profile() {
        let crew = NewsCrew::new(profile(ExperienceLevel::Beginner));
        let goal = &crew.agents()[0].goal;
        assert!(goal.starts_with(
            "Curate and summarize financial news that aligns with long_term investment strategy"
        ));
        assert!(goal.contains("focusing on technology, finance sectors"));
        assert!(goal.contains("with medium risk tolerance"));
        assert!(goal.contains("relevant to beginner level investors"));
    }

    #[test]
    fn tasks_are_parametrized_by_profile() {
        let crew = NewsCrew::new(profile(ExperienceLevel::Expert));
        let [curation, summary, scoring] = crew.tasks() else {
            panic!("expected three tasks");
        };

        assert!(curation.description.contains("focusing on technology OR finance sectors"));
        assert!(curation.description.contains("today's market movements and breaking news"));
        assert_eq!(curation.agent.role, "Expert Financial News Analyst");

        assert!(summary.description.contains("Use precise financial terminology"));
        assert_eq!(summary.agent.role, "Financial News Summarizer");

        assert!(scoring.description.contains("- Industries: technology, finance\n"));
        assert!(scoring.description.contains("- Investment frequency: daily\n"));
        assert_eq!(scoring.agent.role, "Investment Relevance Analyst");
    }

    #[test]
    fn update_rebuilds_agents_and_tasks() {
        let mut crew = NewsCrew::new(profile(ExperienceLevel::Beginner));
        let mut next = profile(ExperienceLevel::Expert);
        next.investment_frequency = InvestmentFrequency::Quarterly;
        crew.update_user_profile(next.clone());

        assert_eq!(crew.profile(), &next);
        assert_eq!(crew.agents()[0].role, "Expert Financial News Analyst");
        assert!(crew.tasks()[0]
            .description
            .contains("significant quarterly developments and earnings"));
    }
}
