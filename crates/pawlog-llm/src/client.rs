//! Generative-model client.

use std::sync::Arc;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::GatewayConfig;

/// Model call errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("missing api key: PAWLOG_GEMINI_API_KEY not set")]
    MissingApiKey,

    #[error("network error: {0}")]
    Transport(String),

    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("response parse error: {0}")]
    Parse(String),
}

impl LlmError {
    /// Stable label for notices and telemetry. Carries no request details.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::MissingApiKey => "missing_api_key",
            LlmError::Transport(_) => "transport",
            LlmError::Http { .. } => "http",
            LlmError::EmptyResponse => "empty_response",
            LlmError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Transport(e.without_url().to_string())
    }
}

/// Header carrying the Gemini credential, kept out of the request URL.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// A text-in, text-out model endpoint. One round trip, no retries.
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

impl<T: GenerativeModel + ?Sized> GenerativeModel for Arc<T> {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub fn generate_content_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

fn build_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user".to_string(),
            parts: vec![RequestPart {
                text: prompt.to_string(),
            }],
        }],
    }
}

/// Concatenated text parts of the first candidate.
fn first_candidate_text(body: &str) -> Result<String, LlmError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pawlog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = generate_content_url(&self.base_url, &self.model);
        debug!(model = %self.model, prompt_len = prompt.len(), "generateContent");

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_request(prompt))
            .send()?;
        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }
        first_candidate_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url("https://example.test/v1beta/", "gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_transport_error_omits_credential() {
        let config = GatewayConfig {
            api_key: Some("SUPER-SECRET-KEY".to_string()),
            base_url: "http://127.0.0.1:1/v1beta".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..GatewayConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();

        let err = client.generate("hello").unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{:?}", err).contains("SUPER-SECRET-KEY"));
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(build_request("hello")).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let body = r#"{"candidates":[
            {"content":{"role":"model","parts":[{"text":"{\"answer\":"},{"text":"\"ok\"}"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(first_candidate_text(body).unwrap(), r#"{"answer":"ok"}"#);
    }

    #[test]
    fn test_no_candidates_is_empty_response() {
        assert_eq!(
            first_candidate_text(r#"{"candidates":[]}"#),
            Err(LlmError::EmptyResponse)
        );
        assert!(matches!(first_candidate_text("<html>"), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_client_requires_key() {
        let config = GatewayConfig::default();
        assert!(matches!(GeminiClient::new(&config), Err(LlmError::MissingApiKey)));
    }
}
