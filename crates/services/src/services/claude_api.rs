//! Claude API client for devotional content generation.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Error)]
pub enum ClaudeApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: ANTHROPIC_API_KEY environment variable not set")]
    MissingApiKey,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for Claude API
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Content block in response
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Response from Claude API
#[derive(Debug, Deserialize)]
pub struct ClaudeResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

impl ClaudeResponse {
    /// Extract the text content from the response
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
        })
    }
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Claude API client. Every call is a single attempt; a failed generation
/// publishes nothing and the next trigger starts over.
#[derive(Debug, Clone)]
pub struct ClaudeApiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl ClaudeApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create a new client using the ANTHROPIC_API_KEY environment variable
    pub fn from_env() -> Result<Self, ClaudeApiError> {
        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ClaudeApiError::MissingApiKey)?;
        Self::new(api_key, None)
    }

    /// Create a new client with the given API key
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, ClaudeApiError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("daily-qt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClaudeApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Send a completion request to Claude
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        temperature: Option<f32>,
        max_tokens: u32,
    ) -> Result<ClaudeResponse, ClaudeApiError> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens,
            messages,
            system,
            temperature,
        };

        let res = self
            .http
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<ClaudeResponse>()
                .await
                .map_err(|e| ClaudeApiError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ClaudeApiError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(ClaudeApiError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(ClaudeApiError::Http { status, body })
            }
        }
    }

    /// Send a prompt expecting a JSON object somewhere in the response
    pub async fn ask_json<T: for<'de> Deserialize<'de>>(
        &self,
        prompt: &str,
        system: Option<String>,
        temperature: Option<f32>,
        max_tokens: u32,
    ) -> Result<T, ClaudeApiError> {
        let response = self
            .complete(vec![Message::user(prompt)], system, temperature, max_tokens)
            .await?
            .text()
            .map(|s| s.to_string())
            .ok_or_else(|| ClaudeApiError::Serde("No text content in response".to_string()))?;

        let json_str = extract_json_object(&response).ok_or_else(|| {
            tracing::error!(
                response_preview = %response.chars().take(200).collect::<String>(),
                "No JSON object found in response"
            );
            ClaudeApiError::Serde("No JSON object in response".to_string())
        })?;

        serde_json::from_str(json_str).map_err(|e| {
            tracing::error!(
                json_error = %e,
                extracted_json_preview = %json_str.chars().take(500).collect::<String>(),
                "Failed to parse JSON response from Claude"
            );
            ClaudeApiError::Serde(format!(
                "{} (response preview: {})",
                e,
                json_str.chars().take(500).collect::<String>()
            ))
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClaudeApiError {
    if e.is_timeout() {
        ClaudeApiError::Timeout
    } else {
        ClaudeApiError::Transport(e.to_string())
    }
}

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("hardcoded pattern compiles"));

/// Locate the outermost `{...}` span in model output. The match is greedy,
/// first `{` to last `}`, so nested objects and prose around the object are
/// handled; output with no object at all yields `None`.
fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_object() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(extract_json_object(input), Some(r#"{"key": "value"}"#));
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let input = "다음은 요청하신 결과입니다:\n{\"scripture\": \"본문\"}\n도움이 되길 바랍니다.";
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"scripture": "본문"}"#)
        );
    }

    #[test]
    fn greedy_match_spans_nested_objects() {
        let input = r#"{"a": {"b": 1}, "c": 2}"#;
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract_json_object("죄송합니다, 본문을 찾을 수 없습니다."), None);
        assert_eq!(extract_json_object(""), None);
    }
}
