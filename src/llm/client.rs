//! Async LLM client for the completion endpoint
//!
//! A small HTTP client that speaks the OpenAI chat-completions format, with
//! the Anthropic messages format picked automatically when the base address
//! points at anthropic.com. Every request is independent: the client keeps
//! no conversation history.

use crate::core::config::{SamplingParams, ShellConfig};
use crate::core::error::{Result, ShellError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Prompt envelope for a single completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    /// Build the usual system + user pair
    pub fn new(system: impl Into<String>, user: impl Into<String>, sampling: SamplingParams) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            sampling,
        }
    }

    /// Content of the system message, if any
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }

    /// Content of the last user message, if any
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// Anything that can turn a prompt envelope into generated text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&base_url);
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_format,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
        )
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Full endpoint address for the detected format
    pub fn endpoint(&self) -> String {
        match self.api_format {
            ApiFormat::Anthropic => format!("{}/messages", self.base_url),
            ApiFormat::OpenAI => format!("{}/chat/completions", self.base_url),
        }
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            system: request.system_prompt().unwrap_or_default().to_string(),
            messages: request
                .messages
                .iter()
                .filter(|m| m.role != "system")
                .cloned()
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ShellError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ShellError::LlmError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ShellError::LlmError(e.to_string()))?;

        completion.into_text()
    }

    async fn complete_openai(&self, request: &CompletionRequest) -> Result<String> {
        let body = OpenAIRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            temperature: request.sampling.temperature,
            max_tokens: request.sampling.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ShellError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ShellError::LlmError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ShellError::LlmError(e.to_string()))?;

        completion.into_text()
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            format = ?self.api_format,
            max_tokens = request.sampling.max_tokens,
            "sending completion request"
        );
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(request).await,
            ApiFormat::OpenAI => self.complete_openai(request).await,
        }
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicResponse {
    fn into_text(self) -> Result<String> {
        self.content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| ShellError::LlmError("Empty response".into()))
    }
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAIResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ShellError::LlmError("Empty response".into()))
    }
}
