//! Google Gemini implementation of [`CompletionService`].
//!
//! Sends one `generateContent` request per prompt and returns the text of
//! the first candidate. The API key travels in the `x-goog-api-key` header,
//! never in the URL.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::config::GatewayConfig;
use super::trait_def::CompletionService;
use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiGateway {
    client: Client,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String, ServiceError> {
        if let Some(err) = response.error {
            return Err(ServiceError::Provider {
                status: 200,
                message: err.message,
            });
        }

        let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
            return Err(ServiceError::EmptyResponse {
                reason: block_reason,
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse {
                reason: candidate.finish_reason.or(block_reason),
            });
        }
        Ok(text)
    }

    /// Pull the provider's message out of an error body, falling back to the
    /// body itself.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_owned())
    }
}

#[async_trait]
impl CompletionService for GeminiGateway {
    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: prompt }],
            }],
        };

        debug!("sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion request failed");
                ServiceError::transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ServiceError::transport)?;

        if !status.is_success() {
            let message = Self::error_message(&body);
            error!(status = %status, %message, "completion service returned an error");
            return Err(ServiceError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "unreadable generateContent body");
            debug!(body = %body, "raw generateContent body");
            ServiceError::Provider {
                status: status.as_u16(),
                message: format!("unreadable response body: {e}"),
            }
        })?;

        let text = Self::extract_text(parsed)?;
        debug!(response_len = text.len(), "received completion");
        Ok(text)
    }
}

impl fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_has_single_user_turn() {
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn endpoint_includes_model() {
        let gateway = GeminiGateway::new(
            GatewayConfig::new("k")
                .with_model("gemini-test")
                .with_base_url("http://localhost:1234/v1beta"),
        );
        assert_eq!(
            gateway.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn text_parts_are_concatenated() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(GeminiGateway::extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn blocked_prompt_is_empty_response_with_reason() {
        let response = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        match GeminiGateway::extract_text(response) {
            Err(ServiceError::EmptyResponse { reason }) => {
                assert_eq!(reason.as_deref(), Some("SAFETY"))
            }
            other => panic!("expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn candidate_without_text_is_empty_response() {
        let response = parse(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }));
        match GeminiGateway::extract_text(response) {
            Err(ServiceError::EmptyResponse { reason }) => {
                assert_eq!(reason.as_deref(), Some("MAX_TOKENS"))
            }
            other => panic!("expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn error_message_prefers_provider_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(GeminiGateway::error_message(body), "API key not valid");
        assert_eq!(GeminiGateway::error_message(" upstream down \n"), "upstream down");
    }
}
