use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw questionnaire answers (or field updates), keyed by question id.
pub type Responses = serde_json::Map<String, Value>;

pub const MAX_INDUSTRIES: usize = 4;

/// Industries offered by the questionnaire. Stored preferences are not checked
/// against this list.
pub const INDUSTRIES: [&str; 10] = [
    "technology",
    "healthcare",
    "finance",
    "energy",
    "consumer",
    "real_estate",
    "telecommunications",
    "manufacturing",
    "aerospace",
    "media",
];

/// Returned by `FromStr` when a string is not one of an enum's tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

macro_rules! tagged_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err(UnknownTag(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tagged_enum!(InvestmentFrequency {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
});

tagged_enum!(
    /// Short is under a year, medium 1-5 years, long over 5 years.
    InvestmentHorizon {
        ShortTerm => "short_term",
        MediumTerm => "medium_term",
        LongTerm => "long_term",
    }
);

tagged_enum!(RiskAppetite {
    Low => "low",
    Medium => "medium",
    High => "high",
    VeryHigh => "very_high",
});

tagged_enum!(ExperienceLevel {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
    Expert => "expert",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub investment_frequency: InvestmentFrequency,
    pub industry_preferences: Vec<String>,
    pub investment_horizon: InvestmentHorizon,
    pub investment_period: String,
    pub risk_appetite: RiskAppetite,
    pub experience_level: ExperienceLevel,
}

/// Profile attributes that may be changed after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    InvestmentFrequency,
    IndustryPreferences,
    InvestmentHorizon,
    InvestmentPeriod,
    RiskAppetite,
    ExperienceLevel,
}

impl ProfileField {
    pub const ALL: &'static [ProfileField] = &[
        ProfileField::InvestmentFrequency,
        ProfileField::IndustryPreferences,
        ProfileField::InvestmentHorizon,
        ProfileField::InvestmentPeriod,
        ProfileField::RiskAppetite,
        ProfileField::ExperienceLevel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::InvestmentFrequency => "investment_frequency",
            ProfileField::IndustryPreferences => "industry_preferences",
            ProfileField::InvestmentHorizon => "investment_horizon",
            ProfileField::InvestmentPeriod => "investment_period",
            ProfileField::RiskAppetite => "risk_appetite",
            ProfileField::ExperienceLevel => "experience_level",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == key)
    }
}

impl Profile {
    /// Builds a profile from answers keyed by question id
    /// (`frequency, industries, horizon, period, risk, experience`).
    pub fn from_responses(user_id: &str, responses: &Responses) -> Result<Self, ProfileError> {
        let mut errors = Vec::new();
        if user_id.trim().is_empty() {
            errors.push("User id must not be empty".to_string());
        }

        let frequency = parse_tag(
            responses.get("frequency"),
            "Invalid investment frequency",
            &mut errors,
        );
        let industries = parse_industries(responses.get("industries").unwrap_or(&Value::Null))
            .map_err(|e| errors.push(e))
            .ok();
        let horizon = parse_tag(
            responses.get("horizon"),
            "Invalid investment horizon",
            &mut errors,
        );
        let period = match responses.get("period").and_then(Value::as_str) {
            Some(p) if !p.is_empty() => Some(p.to_string()),
            _ => {
                errors.push("Invalid investment period".to_string());
                None
            }
        };
        let risk = parse_tag(responses.get("risk"), "Invalid risk appetite", &mut errors);
        let experience = parse_tag(
            responses.get("experience"),
            "Invalid experience level",
            &mut errors,
        );

        match (frequency, industries, horizon, period, risk, experience) {
            (Some(f), Some(i), Some(h), Some(p), Some(r), Some(e)) if errors.is_empty() => {
                Ok(Self {
                    user_id: user_id.to_string(),
                    investment_frequency: f,
                    industry_preferences: i,
                    investment_horizon: h,
                    investment_period: p,
                    risk_appetite: r,
                    experience_level: e,
                })
            }
            _ => Err(ProfileError::Validation(errors)),
        }
    }

    /// Replaces one attribute after checking the new value against its domain.
    pub fn set_field(&mut self, field: ProfileField, value: &Value) -> Result<(), String> {
        match field {
            ProfileField::InvestmentFrequency => {
                self.investment_frequency = tag_value(value, "Invalid investment frequency")?;
            }
            ProfileField::IndustryPreferences => {
                self.industry_preferences = parse_industries(value)?;
            }
            ProfileField::InvestmentHorizon => {
                self.investment_horizon = tag_value(value, "Invalid investment horizon")?;
            }
            ProfileField::InvestmentPeriod => match value.as_str() {
                Some(p) if !p.is_empty() => self.investment_period = p.to_string(),
                _ => return Err("Invalid investment period".to_string()),
            },
            ProfileField::RiskAppetite => {
                self.risk_appetite = tag_value(value, "Invalid risk appetite")?;
            }
            ProfileField::ExperienceLevel => {
                self.experience_level = tag_value(value, "Invalid experience level")?;
            }
        }
        Ok(())
    }
}

fn tag_value<T: FromStr>(value: &Value, message: &str) -> Result<T, String> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| message.to_string())
}

fn parse_tag<T: FromStr>(
    value: Option<&Value>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    let parsed = value.and_then(|v| tag_value(v, message).ok());
    if parsed.is_none() {
        errors.push(message.to_string());
    }
    parsed
}

/// Checks shape and count of an industry selection; the vocabulary is not enforced.
pub(crate) fn parse_industries(value: &Value) -> Result<Vec<String>, String> {
    let Some(items) = value.as_array() else {
        return Err("Industries must be a list".to_string());
    };
    if items.is_empty() {
        return Err("Please select at least one industry".to_string());
    }
    if items.len() > MAX_INDUSTRIES {
        return Err(format!("Please select no more than {MAX_INDUSTRIES} industries"));
    }
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| "Industry selections must be text".to_string())
}
