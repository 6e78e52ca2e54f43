use crate::config::Settings;
use crate::crew::NewsCrew;
use crate::domain::contract::LlmNewsDigest;
use crate::domain::digest::{NewsDigest, MAX_DIGEST_ARTICLES};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::json;
use crate::llm::{DigestInput, LlmClient, Provider};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT_SECS: u64 = 90;

const TOOL_NAME_EMIT_DIGEST: &str = "emit_digest";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_anthropic_api_key()?.to_string();
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = std::env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_tokens,
        })
    }

    async fn create_message(
        &self,
        user_id: &str,
        req: CreateMessageRequest,
    ) -> anyhow::Result<(serde_json::Value, CreateMessageResponse)> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("Anthropic request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Anthropic response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::Anthropic,
                user_id: user_id.to_string(),
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        let raw_json = serde_json::from_str::<serde_json::Value>(&text)
            .with_context(|| format!("failed to parse Anthropic response JSON: {text}"))?;
        let parsed = serde_json::from_value::<CreateMessageResponse>(raw_json.clone())
            .context("failed to decode Anthropic response into CreateMessageResponse")?;
        Ok((raw_json, parsed))
    }

    fn tools() -> Vec<Tool> {
        let schema = serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["articles"],
            "properties": {
                "articles": {
                    "type": "array",
                    "minItems": 1,
                    "maxItems": MAX_DIGEST_ARTICLES,
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": [
                            "rank", "title", "source", "url", "summary",
                            "key_takeaway", "relevance_score", "priority", "tags"
                        ],
                        "properties": {
                            "rank": {"type": "integer"},
                            "title": {"type": "string"},
                            "source": {"type": ["string", "null"]},
                            "url": {"type": ["string", "null"]},
                            "summary": {"type": "string"},
                            "key_takeaway": {"type": ["string", "null"]},
                            "relevance_score": {"type": "integer", "minimum": 1, "maximum": 10},
                            "priority": {"type": "string", "enum": ["High", "Medium", "Low"]},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                }
            }
        });

        vec![Tool {
            name: TOOL_NAME_EMIT_DIGEST,
            description: "Emit the final personalized news digest as structured JSON",
            input_schema: schema,
        }]
    }

    fn tool_choice() -> ToolChoice {
        ToolChoice::Tool {
            name: TOOL_NAME_EMIT_DIGEST,
        }
    }

    /// The crew's personas, presented as one collaborating team.
    fn system_prompt(crew: &NewsCrew) -> String {
        let mut lines = vec![
            "You are a team of financial news specialists working in sequence.".to_string(),
        ];
        for (i, agent) in crew.agents().iter().enumerate() {
            lines.push(format!(
                "{}. {}\n   Goal: {}\n   Background: {}",
                i + 1,
                agent.role,
                agent.goal,
                agent.backstory
            ));
        }
        lines.extend(
            [
                "Rules:",
                "- Use only the provided articles; never invent headlines, sources or URLs",
                "- Return at most 12 articles, ranks 1..N unique and contiguous, best first",
                "- relevance_score is an integer in [1, 10]",
                "- priority is one of High, Medium, Low",
                "- Emit the result with the emit_digest tool. \
                 Return ONLY JSON if you cannot use the tool.",
            ]
            .map(str::to_string),
        );
        lines.join("\n")
    }

    fn user_prompt(input: &DigestInput) -> String {
        let mut out = String::new();
        for (i, task) in input.crew.tasks().iter().enumerate() {
            out.push_str(&format!(
                "Task {} ({}):\n{}\nExpected output:\n{}\n\n",
                i + 1,
                task.agent.role,
                task.description,
                task.expected_output
            ));
        }
        out.push_str(&format!("Articles JSON:\n{}", input.articles_json()));
        out
    }

    fn response_text(res: &CreateMessageResponse) -> String {
        let mut out = String::new();
        for block in &res.content {
            if let ContentBlock::Text { text } = block {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
        out
    }

    fn response_tool_digest(res: &CreateMessageResponse) -> anyhow::Result<Option<LlmNewsDigest>> {
        for block in &res.content {
            if let ContentBlock::ToolUse { name, input, .. } = block {
                if name == TOOL_NAME_EMIT_DIGEST {
                    let parsed = serde_json::from_value::<LlmNewsDigest>(input.clone())
                        .context("failed to decode tool_use.input into LlmNewsDigest")?;
                    return Ok(Some(parsed));
                }
            }
        }
        Ok(None)
    }

    pub async fn generate_digest_with_raw(
        &self,
        input: DigestInput,
    ) -> anyhow::Result<(NewsDigest, serde_json::Value)> {
        let req = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: Some(Self::system_prompt(&input.crew)),
            messages: vec![Message {
                role: "user",
                content: Self::user_prompt(&input),
            }],
            tools: Some(Self::tools()),
            tool_choice: Some(Self::tool_choice()),
        };

        let (raw_json, res) = self.create_message(input.user_id(), req).await?;

        if matches!(res.stop_reason.as_deref(), Some("max_tokens")) {
            return Err(LlmDiagnosticsError {
                provider: Provider::Anthropic,
                user_id: input.user_id().to_string(),
                stage: "max_tokens",
                detail: format!("output truncated at max_tokens={}", self.max_tokens),
                raw_output: Some(Self::response_text(&res)),
                raw_response_json: Some(raw_json),
            }
            .into());
        }

        if let Some(tool_digest) = Self::response_tool_digest(&res)? {
            let digest = tool_digest.validate_and_into_digest(input.user_id(), input.generated_at)?;
            return Ok((digest, raw_json));
        }

        // Text fallback when the model ignored the tool.
        let text = Self::response_text(&res);
        match json::parse_digest(&text, input.user_id(), input.generated_at) {
            Ok(digest) => Ok((digest, raw_json)),
            Err(err) => Err(LlmDiagnosticsError {
                provider: Provider::Anthropic,
                user_id: input.user_id().to_string(),
                stage: "parse",
                detail: format!("{err:#}"),
                raw_output: Some(text),
                raw_response_json: Some(raw_json),
            }
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn generate_digest(&self, input: DigestInput) -> anyhow::Result<NewsDigest> {
        let (digest, _raw) = self.generate_digest_with_raw(input).await?;
        Ok(digest)
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,

    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    input_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum ToolChoice {
    #[serde(rename = "tool")]
    Tool { name: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    #[serde(other)]
    Unknown,
}
