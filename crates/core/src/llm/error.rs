use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

/// LLM failure with enough raw context to debug the prompt afterwards.
#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub user_id: String,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={}, user_id={}, stage={}): {}",
            self.provider.as_str(),
            self.user_id,
            self.stage,
            self.detail
        )
    }
}

impl std::error::Error for LlmDiagnosticsError {}
