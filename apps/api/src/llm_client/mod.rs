//! LLM Gateway — the single point of entry for all model calls in the service.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through `LlmGateway`.
//!
//! The gateway makes exactly one call per request and never interprets the
//! returned text; unwrapping and schema checks belong to `report::normalizer`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::{JSON_ONLY_SYSTEM, NAME_LIST_SYSTEM};

/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("LLM request timed out: {0}")]
    Timeout(String),

    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    #[error("LLM provider rejected the request: {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
}

impl GatewayError {
    /// Timeouts and outages may succeed on a later attempt; rejections will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }
}

/// Per-call generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub system: &'static str,
    /// Ask the provider for machine-parseable JSON output.
    pub structured_output: bool,
    pub temperature: Option<f32>,
}

impl GenerateOptions {
    /// Full analysis report.
    pub const REPORT: Self = Self {
        system: JSON_ONLY_SYSTEM,
        structured_output: true,
        temperature: None,
    };

    /// Short classification prompts returning a small list of names.
    pub const NAME_LIST: Self = Self {
        system: NAME_LIST_SYSTEM,
        structured_output: true,
        temperature: Some(0.2),
    };
}

/// A prompt-in, text-out model endpoint.
///
/// Carried in `AppState` as `Arc<dyn LlmGateway>` so tests can script replies.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerateOptions)
        -> Result<String, GatewayError>;

    async fn generate_report(&self, prompt: &str) -> Result<String, GatewayError> {
        self.generate(prompt, &GenerateOptions::REPORT).await
    }

    async fn generate_name_list(&self, prompt: &str) -> Result<String, GatewayError> {
        self.generate(prompt, &GenerateOptions::NAME_LIST).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Set on reasoning parts that are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    /// Builds the client. `timeout` of `None` leaves the transport default in place.
    pub fn new(
        api_key: String,
        api_base: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            endpoint: format!(
                "{}/models/{MODEL}:generateContent",
                api_base.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl LlmGateway for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, GatewayError> {
        let request_body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: options.system,
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: options.structured_output.then_some(JSON_MIME_TYPE),
                temperature: options.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            warn!("LLM API returned {}", status);
            return Err(classify_status(status, &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Unavailable(format!("undecodable response envelope: {e}"))
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        extract_text(parsed)
    }
}

/// Maps a transport failure onto the gateway taxonomy.
fn classify_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else {
        GatewayError::Unavailable(err.to_string())
    }
}

/// Maps a non-success HTTP status onto the gateway taxonomy.
/// 429 counts as a rejection: quota exhaustion does not clear on an immediate retry.
fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<GeminiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::Timeout(format!("status {}: {message}", status.as_u16()))
        }
        s if s.is_server_error() => {
            GatewayError::Unavailable(format!("status {}: {message}", s.as_u16()))
        }
        s => GatewayError::Rejected {
            status: Some(s.as_u16()),
            message,
        },
    }
}

/// Joins the answer parts of the first candidate.
fn extract_text(response: GeminiResponse) -> Result<String, GatewayError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(GatewayError::Rejected {
            status: None,
            message: format!("prompt blocked: {reason}"),
        });
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::Rejected {
            status: None,
            message: "no candidates returned".to_string(),
        })?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(GatewayError::Rejected {
            status: None,
            message: format!("empty content (finish reason {reason})"),
        });
    }

    Ok(text)
}

#[cfg(test)]
pub mod testing {
    //! Scripted gateway double for service and handler tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays queued replies in order and records every prompt it receives.
    #[derive(Default)]
    pub struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<(String, GenerateOptions)>>,
    }

    impl ScriptedGateway {
        pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn calls(&self) -> Vec<(String, GenerateOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(
            &self,
            prompt: &str,
            options: &GenerateOptions,
        ) -> Result<String, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), *options));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Unavailable("script exhausted".to_string())))
        }
    }
}
