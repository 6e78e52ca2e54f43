/// Search terms for a sector query, keyed by industry tag.
/// Tags without an entry are searched verbatim.
pub fn sector_keywords(industry: &str) -> &str {
    match industry.to_ascii_lowercase().as_str() {
        "technology" => "technology tech software AI cloud",
        "healthcare" => "healthcare pharma biotech medical",
        "finance" => "finance banking fintech insurance",
        "energy" => "energy oil gas renewable solar",
        "consumer" => "consumer retail e-commerce automotive",
        "real_estate" => "real estate REIT property construction",
        "telecommunications" => "telecom wireless 5G network",
        "manufacturing" => "manufacturing industrial machinery supply chain",
        "aerospace" => "aerospace defense aviation satellite",
        "media" => "media entertainment streaming advertising",
        _ => industry,
    }
}

/// Finer-grained keywords used to tag articles by industry.
pub fn industry_keywords(industry: &str) -> &'static [&'static str] {
    match industry {
        "technology" => &[
            "tech",
            "software",
            "AI",
            "artificial intelligence",
            "cloud",
            "cybersecurity",
            "semiconductor",
        ],
        "healthcare" => &[
            "healthcare",
            "pharma",
            "biotech",
            "medical",
            "drug",
            "vaccine",
            "clinical",
        ],
        "finance" => &["bank", "financial", "fintech", "insurance", "credit", "loan", "payment"],
        "energy" => &["oil", "gas", "renewable", "solar", "wind", "energy", "utilities"],
        "consumer" => &["retail", "consumer", "e-commerce", "brand", "restaurant", "automotive"],
        "real_estate" => &["real estate", "REIT", "property", "construction", "housing"],
        "telecommunications" => &["telecom", "wireless", "5G", "network", "infrastructure"],
        _ => &[],
    }
}

/// Industries from `preferences` whose keywords appear in `text` (case-insensitive).
pub fn matching_industries<'a>(text: &str, preferences: &'a [String]) -> Vec<&'a str> {
    let haystack = text.to_lowercase();
    preferences
        .iter()
        .map(String::as_str)
        .filter(|industry| {
            let keywords = industry_keywords(industry);
            if keywords.is_empty() {
                return haystack.contains(&industry.replace('_', " "));
            }
            keywords
                .iter()
                .any(|k| haystack.contains(&k.to_lowercase()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sector_is_searched_verbatim() {
        assert_eq!(sector_keywords("crypto"), "crypto");
        assert_eq!(sector_keywords("Technology"), "technology tech software AI cloud");
    }

    #[test]
    fn matches_industries_by_keyword() {
        let prefs = vec![
            "technology".to_string(),
            "energy".to_string(),
            "media".to_string(),
        ];
        assert_eq!(
            matching_industries("Semiconductor stocks surge as solar demand climbs", &prefs),
            vec!["technology", "energy"]
        );
        assert_eq!(
            matching_industries("Media giants merge", &prefs),
            vec!["media"]
        );
        assert!(matching_industries("Quiet day on Wall Street", &prefs).is_empty());
    }
}
