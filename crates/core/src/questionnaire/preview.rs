use super::is_truthy;
use crate::domain::profile::Responses;
use serde_json::Value;

pub const EMPTY_PREVIEW: &str = "Complete the questionnaire to see your personalized news preview";

fn frequency_line(tag: &str) -> &'static str {
    match tag {
        "daily" => "Daily market updates and breaking news",
        "weekly" => "Weekly market summaries and trend analysis",
        "monthly" => "Monthly market reports and investment insights",
        "quarterly" => "Quarterly portfolio reviews and market outlook",
        "yearly" => "Annual market analysis and long-term projections",
        _ => "Regular updates",
    }
}

fn industry_label(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "technology" => "Tech & Software",
        "healthcare" => "Healthcare & Biotech",
        "finance" => "Financial Services",
        "energy" => "Energy & Utilities",
        "consumer" => "Consumer Goods",
        "real_estate" => "Real Estate",
        "telecommunications" => "Telecom",
        "manufacturing" => "Manufacturing",
        "aerospace" => "Aerospace & Defense",
        "media" => "Media & Entertainment",
        _ => return None,
    })
}

fn risk_line(tag: &str) -> &'static str {
    match tag {
        "low" => "Conservative investment opportunities and stable market news",
        "medium" => "Balanced mix of growth opportunities and risk assessments",
        "high" => "Growth-focused content with emerging market opportunities",
        "very_high" => "High-growth investments, volatility analysis, and aggressive strategies",
        _ => "Balanced content",
    }
}

fn experience_line(tag: &str) -> &'static str {
    match tag {
        "beginner" => "Educational content, basic concepts, and beginner-friendly analysis",
        "intermediate" => "Intermediate strategies, market analysis, and portfolio tips",
        "advanced" => "Advanced techniques, detailed analysis, and complex strategies",
        "expert" => "Expert-level insights, sophisticated analysis, and cutting-edge strategies",
        _ => "Appropriate content",
    }
}

fn horizon_line(tag: &str) -> &'static str {
    match tag {
        "short_term" => "Short-term market movements and quick opportunities",
        "medium_term" => "Medium-term trends and strategic positioning",
        "long_term" => "Long-term investment themes and fundamental analysis",
        _ => "Time-appropriate content",
    }
}

/// Capitalizes the first letter of every alphabetic run ("real_estate" -> "Real_Estate").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

pub fn render(responses: &Responses) -> String {
    if responses.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }

    let tag = |key: &str| responses.get(key).map(|v| v.as_str().unwrap_or(""));

    let mut lines = vec!["Based on your responses, you'll receive:".to_string(), String::new()];

    if let Some(t) = tag("frequency") {
        lines.push(format!("📅 {}", frequency_line(t)));
    }

    if let Some(Value::Array(items)) = responses.get("industries").filter(|v| is_truthy(v)) {
        let labels: Vec<String> = items
            .iter()
            .filter_map(Value::as_str)
            .map(|i| industry_label(i).map_or_else(|| title_case(i), str::to_string))
            .collect();
        lines.push(format!("🏭 Focus on: {}", labels.join(", ")));
    }

    if let Some(t) = tag("risk") {
        lines.push(format!("📊 {}", risk_line(t)));
    }
    if let Some(t) = tag("experience") {
        lines.push(format!("🎓 {}", experience_line(t)));
    }
    if let Some(t) = tag("horizon") {
        lines.push(format!("⏰ {}", horizon_line(t)));
    }

    lines.push(String::new());
    lines.push("✨ All content will be personalized based on your preferences!".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn responses(v: Value) -> Responses {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_responses_yield_placeholder() {
        assert_eq!(render(&Responses::new()), EMPTY_PREVIEW);
    }

    #[test]
    fn renders_answered_fields_in_fixed_order() {
        let out = render(&responses(json!({
            "horizon": "long_term",
            "frequency": "weekly",
            "industries": ["technology", "real_estate"],
            "risk": "low",
        })));
        assert_eq!(
            out,
            "Based on your responses, you'll receive:\n\n\
📅 Weekly market summaries and trend analysis\n\
🏭 Focus on: Tech & Software, Real Estate\n\
📊 Conservative investment opportunities and stable market news\n\
⏰ Long-term investment themes and fundamental analysis\n\n\
✨ All content will be personalized based on your preferences!"
        );
    }

    #[test]
    fn unknown_values_fall_back() {
        let out = render(&responses(json!({
            "frequency": "hourly",
            "industries": ["crypto_assets"],
            "experience": 3,
        })));
        assert!(out.contains("📅 Regular updates"));
        assert!(out.contains("🏭 Focus on: Crypto_Assets"));
        assert!(out.contains("🎓 Appropriate content"));
        assert!(!out.contains("📊"));
    }

    #[test]
    fn is_deterministic() {
        let r = responses(json!({"risk": "high", "experience": "expert"}));
        assert_eq!(render(&r), render(&r));
    }
}
