//! Gemini API client for grounded completions
//!
//! Endpoint: POST /v1beta/models/{model}:generateContent

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::{AssistantError, Result};
use crate::models::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::rag::prompt::user_message;
use crate::rag::Completer;

/// Default Gemini API endpoint
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Default request timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini completion client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a client with default endpoint and model; temperature 0
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(
            DEFAULT_GEMINI_URL,
            DEFAULT_MODEL,
            api_key,
            0.0,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client with custom configuration
    pub fn with_config(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AssistantError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
            temperature,
        })
    }

    /// Build the request body for one grounded question
    pub fn build_request(&self, instruction: &str, context: &str, question: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(None, instruction),
            contents: vec![Content::text(Some("user"), user_message(context, question))],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    /// Send a generateContent request and return the completion text
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::LlmApiError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::LlmApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::LlmApiError(format!("Failed to parse response: {}", e)))?;

        extract_text(&body)
    }

    /// Check that the credential can see the configured model
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);

        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

fn extract_text(body: &GenerateContentResponse) -> Result<String> {
    if let Some(text) = body.text() {
        return Ok(text);
    }

    let reason = body
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
        .or_else(|| body.candidates.first().and_then(|c| c.finish_reason.clone()))
        .unwrap_or_else(|| "no candidates".to_string());

    Err(AssistantError::LlmApiError(format!(
        "Empty completion ({})",
        reason
    )))
}

#[async_trait]
impl Completer for GeminiClient {
    async fn complete(&self, instruction: &str, context: &str, question: &str) -> Result<String> {
        let request = self.build_request(instruction, context, question);
        self.generate(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new("test-key").unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_GEMINI_URL);
        assert_eq!(client.temperature(), 0.0);
    }

    #[test]
    fn test_client_with_config_trims_slash() {
        let client = GeminiClient::with_config(
            "http://localhost:8080/",
            "gemini-test",
            "key",
            0.0,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.model(), "gemini-test");
    }

    #[test]
    fn test_request_serialization() {
        let client = GeminiClient::new("test-key").unwrap();
        let request = client.build_request("Be grounded.", "ctx", "What is a leak?");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "systemInstruction": {"parts": [{"text": "Be grounded."}]},
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "Context: ctx\n\nQuestion: What is a leak?"}]
                }],
                "generationConfig": {"temperature": 0.0}
            })
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "### 1. "}, {"text": "Diagnosis"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&body).unwrap(), "### 1. Diagnosis");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = extract_text(&body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let body: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(&body).unwrap_err().to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_api_error() {
        let client = GeminiClient::with_config(
            "http://127.0.0.1:9",
            DEFAULT_MODEL,
            "key",
            0.0,
            Duration::from_secs(2),
        )
        .unwrap();
        let result = client.complete("instruction", "ctx", "q").await;
        assert!(matches!(result, Err(AssistantError::LlmApiError(_))));
        assert!(!client.health_check().await.unwrap());
    }
}
