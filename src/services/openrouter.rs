use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Message roles accepted by the chat completions endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Strict JSON-schema constraint on the model's output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// The `response_format` field of a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

/// Outbound chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Validates the request shape before it leaves the process
    ///
    /// Failing fast on caller errors avoids surfacing them as confusing
    /// provider-side 400s.
    pub fn validate(&self) -> AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Completion model cannot be empty".to_string(),
            ));
        }

        if self.messages.is_empty() {
            return Err(AppError::InvalidInput(
                "Completion request must contain at least one message".to_string(),
            ));
        }

        if self.messages.iter().any(|m| m.content.trim().is_empty()) {
            return Err(AppError::InvalidInput(
                "Completion messages cannot have empty content".to_string(),
            ));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::InvalidInput(format!(
                    "Temperature {} outside supported range [0, 2]",
                    temperature
                )));
            }
        }

        if self.max_tokens == Some(0) {
            return Err(AppError::InvalidInput(
                "max_tokens must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Inbound chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionResponse {
    /// First choice's message content, if the response carried one
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .filter(|content| !content.is_empty())
    }

    fn validate(&self) -> AppResult<()> {
        if self.content().is_none() {
            return Err(AppError::ExternalApi(
                "Completion response missing message content".to_string(),
            ));
        }
        Ok(())
    }
}

/// Abstraction over the LLM completion provider
///
/// The orchestrator depends on this seam so tests can substitute a mock
/// and assert that ineligible users never trigger a provider call.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: ChatCompletionRequest) -> AppResult<ChatCompletionResponse>;
}

/// Client for the OpenRouter chat completions API
///
/// Single POST with bearer auth; request and response shapes are both
/// validated on this side of the wire. The shared reqwest client carries
/// the process-wide request deadline, so a hung provider cannot block a
/// generation call indefinitely.
#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenRouterClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: ChatCompletionRequest) -> AppResult<ChatCompletionResponse> {
        request.validate()?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "OpenRouter API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "OpenRouter API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion.validate()?;

        tracing::debug!(completion_id = %completion.id, "Chat completion received");

        Ok(completion)
    }
}
