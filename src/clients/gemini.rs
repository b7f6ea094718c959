use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::db::models::ai::{ChatRole, ChatTurn};
use crate::error::AppError;
use crate::utils::{RetryPolicy, with_retry_and_timeout};

const DEFAULT_SUMMARY_PROMPT: &str = "Summarize the text in 7 clear bullet points covering: \
objective, method, findings, limitations and 3 short verbatim quotes.";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generative text provider is not configured")]
    NotConfigured,

    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("generation timed out")]
    Timeout,

    #[error("provider request failed: {0}")]
    Failed(String),
}

impl From<tokio::time::error::Elapsed> for GenerateError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        GenerateError::Timeout
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Timeout => {
                AppError::timeout("Generation took too long, try again with less text")
            }
            GenerateError::NotConfigured => AppError::internal("AI provider is not configured"),
            other => AppError::internal(format!("Error contacting the AI provider: {}", other)),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug, Clone)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role: role.as_str(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

/// Client for a Gemini-style `models/{model}:generateContent` endpoint.
#[derive(Clone)]
pub struct AiClient {
    http: Client,
    config: AiConfig,
    policy: RetryPolicy,
}

impl AiClient {
    pub fn new(http: Client, config: AiConfig) -> Self {
        let policy = RetryPolicy::with_timeout_ms(config.timeout_ms);
        Self {
            http,
            config,
            policy,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }

    /// Returns the summary text produced by the text model.
    pub async fn summarize(&self, text: &str, prompt: Option<&str>) -> Result<String, GenerateError> {
        let instruction = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SUMMARY_PROMPT);

        let contents = vec![
            Content::new(ChatRole::User, format!("Text to summarize:\n{}", text)),
            Content::new(ChatRole::User, instruction),
        ];
        self.generate(&self.config.text_model, contents, 0.3).await
    }

    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<String, GenerateError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::new(turn.role(), turn.text.clone()))
            .collect();
        contents.push(Content::new(ChatRole::User, message));
        self.generate(&self.config.chat_model, contents, 0.7).await
    }

    async fn generate(
        &self,
        model: &str,
        contents: Vec<Content>,
        temperature: f32,
    ) -> Result<String, GenerateError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerateError::NotConfigured)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );
        let body = GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: 512,
            },
        };

        let response = with_retry_and_timeout(
            &self.policy,
            "generateContent",
            |e| matches!(e, GenerateError::RateLimited(_)),
            || self.send_once(&url, api_key, &body),
        )
        .await?;

        Ok(extract_text(&response))
    }

    async fn send_once(
        &self,
        url: &str,
        api_key: &str,
        body: &GenerateRequest,
    ) -> Result<Value, GenerateError> {
        debug!(url = %url, "Calling generative text provider");
        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| GenerateError::Failed(e.to_string()))?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(payload);
        }

        let provider_status = payload
            .pointer("/error/status")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let message = payload
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("no error message")
            .to_string();

        warn!(status = %status, provider_status = %provider_status, "Generative text provider error");

        if status == StatusCode::TOO_MANY_REQUESTS || provider_status == "RESOURCE_EXHAUSTED" {
            Err(GenerateError::RateLimited(message))
        } else {
            Err(GenerateError::Failed(format!("{}: {}", status, message)))
        }
    }
}

/// Concatenates `candidates[].content.parts[].text` with newlines. A top-level
/// non-empty `text` field wins when present.
pub fn extract_text(response: &Value) -> String {
    if let Some(text) = response.get("text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }

    let texts: Vec<&str> = response
        .get("candidates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|c| c.pointer("/content/parts").and_then(Value::as_array))
        .flatten()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .collect();

    texts.join("\n").trim().to_string()
}
