use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    #[serde(rename = "question")]
    pub prompt: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [QuestionOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl Question {
    pub fn option_label(&self, value: &str) -> Option<&'static str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label)
    }
}

fn no_options(options: &&'static [QuestionOption]) -> bool {
    options.is_empty()
}

const fn opt(value: &'static str, label: &'static str) -> QuestionOption {
    QuestionOption { value, label }
}

/// Ids every complete response set must answer, in catalog order.
pub const REQUIRED_IDS: [&str; 6] = [
    "frequency",
    "industries",
    "horizon",
    "period",
    "risk",
    "experience",
];

pub const QUESTIONS: &[Question] = &[
    Question {
        id: "frequency",
        prompt: "How frequently do you plan to invest?",
        kind: QuestionType::SingleChoice,
        options: &[
            opt("daily", "Daily - Active trading"),
            opt("weekly", "Weekly - Regular contributions"),
            opt("monthly", "Monthly - Steady investing"),
            opt("quarterly", "Quarterly - Periodic investments"),
            opt("yearly", "Yearly - Annual contributions"),
        ],
        max_selections: None,
        placeholder: None,
    },
    Question {
        id: "industries",
        prompt: "Which industries interest you most? (Select up to 4)",
        kind: QuestionType::MultipleChoice,
        options: &[
            opt("technology", "Technology & Software"),
            opt("healthcare", "Healthcare & Biotech"),
            opt("finance", "Financial Services"),
            opt("energy", "Energy & Utilities"),
            opt("consumer", "Consumer Goods & Retail"),
            opt("real_estate", "Real Estate"),
            opt("telecommunications", "Telecommunications"),
            opt("manufacturing", "Manufacturing & Industrial"),
            opt("aerospace", "Aerospace & Defense"),
            opt("media", "Media & Entertainment"),
        ],
        max_selections: Some(crate::domain::profile::MAX_INDUSTRIES),
        placeholder: None,
    },
    Question {
        id: "horizon",
        prompt: "What is your investment time horizon?",
        kind: QuestionType::SingleChoice,
        options: &[
            opt("short_term", "Short-term (Less than 1 year)"),
            opt("medium_term", "Medium-term (1-5 years)"),
            opt("long_term", "Long-term (More than 5 years)"),
        ],
        max_selections: None,
        placeholder: None,
    },
    Question {
        id: "period",
        prompt: "How long do you plan to invest regularly?",
        kind: QuestionType::TextInput,
        options: &[],
        max_selections: None,
        placeholder: Some("e.g., '2 years', '5-10 years', 'indefinitely'"),
    },
    Question {
        id: "risk",
        prompt: "What is your risk tolerance?",
        kind: QuestionType::SingleChoice,
        options: &[
            opt("low", "Low - Prefer stable, predictable returns"),
            opt("medium", "Medium - Balanced growth with some risk"),
            opt("high", "High - Aggressive growth, comfortable with volatility"),
            opt("very_high", "Very High - Maximum growth potential, high risk tolerance"),
        ],
        max_selections: None,
        placeholder: None,
    },
    Question {
        id: "experience",
        prompt: "What is your investment experience level?",
        kind: QuestionType::SingleChoice,
        options: &[
            opt("beginner", "Beginner - New to investing"),
            opt("intermediate", "Intermediate - Some experience with basic investments"),
            opt("advanced", "Advanced - Experienced with various investment types"),
            opt("expert", "Expert - Sophisticated investor with deep market knowledge"),
        ],
        max_selections: None,
        placeholder: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{
        ExperienceLevel, InvestmentFrequency, InvestmentHorizon, RiskAppetite, INDUSTRIES,
    };

    fn values(id: &str) -> Vec<&'static str> {
        QUESTIONS
            .iter()
            .find(|q| q.id == id)
            .unwrap()
            .options
            .iter()
            .map(|o| o.value)
            .collect()
    }

    #[test]
    fn catalog_order_matches_required_ids() {
        let ids: Vec<_> = QUESTIONS.iter().map(|q| q.id).collect();
        assert_eq!(ids, REQUIRED_IDS);
    }

    #[test]
    fn choice_options_cover_enum_tags() {
        let freq: Vec<_> = InvestmentFrequency::ALL.iter().map(|v| v.as_str()).collect();
        let horizon: Vec<_> = InvestmentHorizon::ALL.iter().map(|v| v.as_str()).collect();
        let risk: Vec<_> = RiskAppetite::ALL.iter().map(|v| v.as_str()).collect();
        let experience: Vec<_> = ExperienceLevel::ALL.iter().map(|v| v.as_str()).collect();
        assert_eq!(values("frequency"), freq);
        assert_eq!(values("horizon"), horizon);
        assert_eq!(values("risk"), risk);
        assert_eq!(values("experience"), experience);
        assert_eq!(values("industries"), INDUSTRIES);
    }

    #[test]
    fn serializes_like_the_form_schema() {
        let v = serde_json::to_value(QUESTIONS[3]).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "id": "period",
                "question": "How long do you plan to invest regularly?",
                "type": "text_input",
                "placeholder": "e.g., '2 years', '5-10 years', 'indefinitely'",
            })
        );

        let v = serde_json::to_value(QUESTIONS[1]).unwrap();
        assert_eq!(v["type"], "multiple_choice");
        assert_eq!(v["max_selections"], 4);
        assert_eq!(v["options"][5]["label"], "Real Estate");
    }
}
