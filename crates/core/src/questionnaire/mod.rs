//! The investor questionnaire: a fixed catalog of questions, validation of raw
//! answers, and conversion of a valid answer set into a stored [`Profile`].

pub mod catalog;
pub mod preview;

use crate::domain::profile::{
    parse_industries, ExperienceLevel, InvestmentFrequency, InvestmentHorizon, Profile,
    Responses, RiskAppetite,
};
use crate::error::ProfileError;
use crate::storage::profiles::ProfileStore;
use catalog::{Question, QuestionType, QUESTIONS, REQUIRED_IDS};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

/// One answered question with its human-readable labels attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedResponse {
    pub question: &'static str,
    pub response: Value,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_labels: Option<Vec<&'static str>>,
}

/// Exported answers in catalog order; serializes as a JSON object keyed by
/// question id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedResponses(Vec<(&'static str, ExportedResponse)>);

impl ExportedResponses {
    pub fn get(&self, question_id: &str) -> Option<&ExportedResponse> {
        self.0
            .iter()
            .find(|(id, _)| *id == question_id)
            .map(|(_, r)| r)
    }

    pub fn contains_key(&self, question_id: &str) -> bool {
        self.get(question_id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ExportedResponses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, response) in &self.0 {
            map.serialize_entry(id, response)?;
        }
        map.end()
    }
}

pub struct Questionnaire {
    store: Arc<ProfileStore>,
    questions: &'static [Question],
}

impl Questionnaire {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self::with_questions(store, QUESTIONS)
    }

    pub fn with_questions(store: Arc<ProfileStore>, questions: &'static [Question]) -> Self {
        Self { store, questions }
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn get_all_questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn get_question_by_id(&self, question_id: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Returns every problem with `responses`; an empty list means they are valid.
    pub fn validate_responses(&self, responses: &Responses) -> Vec<String> {
        let mut errors = Vec::new();

        for id in REQUIRED_IDS {
            if is_blank(responses.get(id)) {
                errors.push(format!("Please answer the {id} question"));
            }
        }

        if let Some(industries) = responses.get("industries") {
            if let Err(e) = parse_industries(industries) {
                errors.push(e);
            }
        }

        let mut check = |key: &str, ok: fn(&str) -> bool, message: &str| {
            if let Some(v) = responses.get(key) {
                if !v.as_str().is_some_and(ok) {
                    errors.push(message.to_string());
                }
            }
        };
        check("frequency", is_tag::<InvestmentFrequency>, "Invalid investment frequency");
        check("horizon", is_tag::<InvestmentHorizon>, "Invalid investment horizon");
        check("risk", is_tag::<RiskAppetite>, "Invalid risk appetite");
        check("experience", is_tag::<ExperienceLevel>, "Invalid experience level");

        if let Some(period) = responses.get("period").filter(|v| is_truthy(v)) {
            if !period.is_string() {
                errors.push("Invalid investment period".to_string());
            }
        }

        errors
    }

    /// Validates `responses` and, only if they are fully valid, stores the profile.
    pub fn create_profile_from_responses(
        &self,
        user_id: &str,
        responses: &Responses,
    ) -> Result<Profile, ProfileError> {
        let errors = self.validate_responses(responses);
        if !errors.is_empty() {
            tracing::debug!(user_id, violations = errors.len(), "questionnaire responses rejected");
            return Err(ProfileError::Validation(errors));
        }
        self.store.create_profile(user_id, responses)
    }

    pub fn get_recommendation_preview(&self, responses: &Responses) -> String {
        preview::render(responses)
    }

    pub fn get_progress_percentage<S: AsRef<str>>(&self, completed: &[S]) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let completed: HashSet<&str> = completed.iter().map(AsRef::as_ref).collect();
        let done = self
            .questions
            .iter()
            .filter(|q| completed.contains(q.id))
            .count();
        (100.0 * done as f64 / self.questions.len() as f64).clamp(0.0, 100.0)
    }

    pub fn get_next_question_id<S: AsRef<str>>(&self, completed: &[S]) -> Option<&'static str> {
        self.questions
            .iter()
            .map(|q| q.id)
            .find(|id| !completed.iter().any(|c| c.as_ref() == *id))
    }

    /// Attaches catalog labels to every answered question, in catalog order.
    pub fn export_responses(&self, responses: &Responses) -> ExportedResponses {
        let mut out = Vec::new();
        for question in self.questions {
            let Some(response) = responses.get(question.id) else {
                continue;
            };

            let (response_label, response_labels) = match question.kind {
                QuestionType::SingleChoice => {
                    (response.as_str().and_then(|v| question.option_label(v)), None)
                }
                QuestionType::MultipleChoice => {
                    let selected = response.as_array().map(Vec::as_slice).unwrap_or_default();
                    let labels = question
                        .options
                        .iter()
                        .filter(|o| selected.iter().any(|s| s.as_str() == Some(o.value)))
                        .map(|o| o.label)
                        .collect();
                    (None, Some(labels))
                }
                QuestionType::TextInput => (None, None),
            };

            out.push((
                question.id,
                ExportedResponse {
                    question: question.prompt,
                    response: response.clone(),
                    kind: question.kind,
                    response_label,
                    response_labels,
                },
            ));
        }
        ExportedResponses(out)
    }
}

/// JSON truthiness: null, false, zero and empty strings/arrays/objects are falsy.
pub(crate) fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn is_blank(v: Option<&Value>) -> bool {
    !v.is_some_and(is_truthy)
}

fn is_tag<T: FromStr>(s: &str) -> bool {
    s.parse::<T>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> (tempfile::TempDir, Questionnaire) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles.json")).unwrap();
        (dir, Questionnaire::new(Arc::new(store)))
    }

    fn responses(v: Value) -> Responses {
        v.as_object().cloned().unwrap()
    }

    fn valid() -> Responses {
        responses(json!({
            "frequency": "daily",
            "industries": ["technology", "finance"],
            "horizon": "long_term",
            "period": "5 years",
            "risk": "medium",
            "experience": "beginner",
        }))
    }

    #[test]
    fn valid_responses_create_and_store_profile() {
        let (_dir, q) = engine();
        assert!(q.validate_responses(&valid()).is_empty());

        let profile = q.create_profile_from_responses("u1", &valid()).unwrap();
        assert_eq!(profile.industry_preferences, vec!["technology", "finance"]);
        assert_eq!(q.store().get_profile("u1"), Some(profile));
    }

    #[test]
    fn one_error_per_missing_required_id() {
        let (_dir, q) = engine();
        let errors = q.validate_responses(&Responses::new());
        assert_eq!(
            errors,
            REQUIRED_IDS
                .iter()
                .map(|id| format!("Please answer the {id} question"))
                .collect::<Vec<_>>()
        );

        let mut partial = valid();
        partial.remove("risk");
        partial.insert("period".to_string(), json!(""));
        assert_eq!(
            q.validate_responses(&partial),
            vec!["Please answer the period question", "Please answer the risk question"]
        );
    }

    #[test]
    fn unknown_risk_is_the_only_error() {
        let (_dir, q) = engine();
        let mut r = valid();
        r.insert("risk".to_string(), json!("extreme"));
        assert_eq!(q.validate_responses(&r), vec!["Invalid risk appetite"]);
    }

    #[test]
    fn industries_shape_errors_are_distinct() {
        let (_dir, q) = engine();

        let mut r = valid();
        r.insert("industries".to_string(), json!("technology"));
        assert_eq!(q.validate_responses(&r), vec!["Industries must be a list"]);

        r.insert("industries".to_string(), json!([]));
        assert_eq!(
            q.validate_responses(&r),
            vec![
                "Please answer the industries question",
                "Please select at least one industry"
            ]
        );

        r.insert(
            "industries".to_string(),
            json!(["technology", "finance", "energy", "media", "aerospace"]),
        );
        assert_eq!(
            q.validate_responses(&r),
            vec!["Please select no more than 4 industries"]
        );
    }

    #[test]
    fn collects_every_violation_at_once() {
        let (_dir, q) = engine();
        let r = responses(json!({
            "frequency": "hourly",
            "industries": ["technology"],
            "horizon": "forever",
            "period": "2 years",
            "risk": "low",
            "experience": "guru",
        }));
        assert_eq!(
            q.validate_responses(&r),
            vec![
                "Invalid investment frequency",
                "Invalid investment horizon",
                "Invalid experience level"
            ]
        );
    }

    #[test]
    fn non_text_period_is_rejected() {
        let (_dir, q) = engine();
        let mut r = valid();
        r.insert("period".to_string(), json!(5));
        assert_eq!(q.validate_responses(&r), vec!["Invalid investment period"]);
    }

    #[test]
    fn invalid_responses_never_touch_the_store() {
        let (dir, q) = engine();
        let mut r = valid();
        r.insert("risk".to_string(), json!("extreme"));

        let err = q.create_profile_from_responses("u1", &r).unwrap_err();
        assert_eq!(err.to_string(), "Invalid responses: Invalid risk appetite");
        assert!(q.store().get_profile("u1").is_none());
        assert!(!dir.path().join("profiles.json").exists());
    }

    #[test]
    fn empty_user_id_is_rejected() {
        let (_dir, q) = engine();
        let err = q.create_profile_from_responses(" ", &valid()).unwrap_err();
        assert!(matches!(err, ProfileError::Validation(_)));
        assert!(q.store().is_empty());
    }

    #[test]
    fn question_lookup() {
        let (_dir, q) = engine();
        assert_eq!(q.get_question_by_id("risk").unwrap().id, "risk");
        assert!(q.get_question_by_id("salary").is_none());
        assert_eq!(q.get_all_questions().len(), 6);
        assert_eq!(q.get_all_questions(), q.get_all_questions());
    }

    #[test]
    fn progress_counts_known_ids_only() {
        let (_dir, q) = engine();
        let none: [&str; 0] = [];
        assert_eq!(q.get_progress_percentage(&none), 0.0);
        assert_eq!(q.get_progress_percentage(&REQUIRED_IDS), 100.0);
        assert_eq!(q.get_progress_percentage(&["risk", "risk", "bogus"]), 100.0 / 6.0);

        let mut last = 0.0;
        for n in 0..=REQUIRED_IDS.len() {
            let pct = q.get_progress_percentage(&REQUIRED_IDS[..n]);
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn progress_on_empty_catalog_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("p.json")).unwrap();
        let q = Questionnaire::with_questions(Arc::new(store), &[]);
        assert_eq!(q.get_progress_percentage(&["risk"]), 0.0);
        assert_eq!(q.get_next_question_id(&["risk"]), None);
    }

    #[test]
    fn next_question_follows_catalog_order() {
        let (_dir, q) = engine();
        let none: [&str; 0] = [];
        assert_eq!(q.get_next_question_id(&none), Some("frequency"));
        assert_eq!(q.get_next_question_id(&["frequency", "horizon"]), Some("industries"));
        assert_eq!(q.get_next_question_id(&REQUIRED_IDS), None);
    }

    #[test]
    fn export_attaches_catalog_labels() {
        let (_dir, q) = engine();
        let mut r = valid();
        r.remove("horizon");
        let out = q.export_responses(&r);

        assert!(!out.contains_key("horizon"));
        let frequency = out.get("frequency").unwrap();
        assert_eq!(frequency.response_label, Some("Daily - Active trading"));
        assert_eq!(frequency.kind, QuestionType::SingleChoice);
        assert_eq!(
            out.get("industries").unwrap().response_labels,
            Some(vec!["Technology & Software", "Financial Services"])
        );
        let period = out.get("period").unwrap();
        assert_eq!(period.response, json!("5 years"));
        assert_eq!(period.response_label, None);
        assert_eq!(period.response_labels, None);
        assert_eq!(
            out.get("risk").unwrap().question,
            "What is your risk tolerance?"
        );
    }

    #[test]
    fn export_keeps_catalog_order() {
        let (_dir, q) = engine();
        let r = responses(json!({
            "risk": "low",
            "experience": "expert",
            "frequency": "weekly",
            "industries": ["media"],
        }));
        let out = q.export_responses(&r);
        assert_eq!(
            out.ids().collect::<Vec<_>>(),
            vec!["frequency", "industries", "risk", "experience"]
        );

        let text = serde_json::to_string(&out).unwrap();
        let positions: Vec<usize> = ["frequency", "industries", "risk", "experience"]
            .iter()
            .map(|id| text.find(&format!("\"{id}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn export_labels_match_catalog_for_every_option() {
        let (_dir, q) = engine();
        for question in q.get_all_questions() {
            for option in question.options {
                let value = match question.kind {
                    QuestionType::MultipleChoice => json!([option.value]),
                    _ => json!(option.value),
                };
                let mut r = Responses::new();
                r.insert(question.id.to_string(), value);
                let out = q.export_responses(&r);
                let exported = out.get(question.id).unwrap();
                match question.kind {
                    QuestionType::MultipleChoice => {
                        assert_eq!(exported.response_labels, Some(vec![option.label]))
                    }
                    _ => assert_eq!(exported.response_label, Some(option.label)),
                }
            }
        }
    }

    #[test]
    fn unknown_single_choice_value_has_no_label() {
        let (_dir, q) = engine();
        let out = q.export_responses(&responses(json!({"risk": "extreme"})));
        assert_eq!(out.get("risk").unwrap().response_label, None);
        let v = serde_json::to_value(out.get("risk").unwrap()).unwrap();
        assert!(v.get("response_label").is_none());
        assert_eq!(v["type"], "single_choice");
    }
}
