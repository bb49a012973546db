//! Chat completions HTTP client.

use crate::error::LlmError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const DEFAULT_MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 5000;

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// The API key is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request, offering `tools` when given.
    #[instrument(skip(self, messages, tools), fields(message_count = messages.len(), tool_count = tools.map_or(0, |t| t.len())))]
    pub async fn chat_with_tools(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponseWithTools, LlmError> {
        let tools = tools.filter(|t| !t.is_empty());
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            tools,
            tool_choice: tools.map(|_| "auto"),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&request)
            .send()
            .await?;

        let chat_response = self.handle_response::<ChatResponse>(response).await?;
        let usage = chat_response.usage;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let result = ChatResponseWithTools {
            content: choice.message.content.filter(|c| !c.is_empty()),
            tool_calls: choice.message.tool_calls,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".into()),
            usage,
        };

        if result.content.is_none() && !result.has_tool_calls() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(result)
    }

    /// Send a chat completion request without tools and return the text.
    pub async fn chat(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        self.chat_with_tools(messages, temperature, max_tokens, None)
            .await?
            .content
            .ok_or(LlmError::EmptyResponse)
    }

    /// Like [`chat_with_tools`](Self::chat_with_tools), retrying transient
    /// failures with exponential backoff.
    ///
    /// Does not retry on authentication errors or empty responses.
    #[instrument(skip(self, messages, tools), fields(message_count = messages.len()))]
    pub async fn chat_with_retry(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        tools: Option<&[ToolDefinition]>,
        max_retries: Option<u32>,
    ) -> Result<ChatResponseWithTools, LlmError> {
        let max_retries = max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempt = 0;

        loop {
            match self
                .chat_with_tools(messages, temperature, max_tokens, tools)
                .await
            {
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(attempt, ?backoff, "Chat request failed, retrying: {}", e);
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(Duration::from_millis(MAX_BACKOFF_MS));
                }
                result => return result,
            }
        }
    }

    /// List available models.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<Model>, LlmError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .send()
            .await?;

        self.handle_response::<ModelsResponse>(response)
            .await
            .map(|r| r.data)
    }

    /// Health check - returns true if the API is reachable and the key is accepted.
    pub async fn health_check(&self) -> bool {
        self.list_models().await.is_ok()
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, LlmError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!(len = body.len(), "Response received");
            serde_json::from_str(&body).map_err(LlmError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    async fn extract_error(&self, response: reqwest::Response) -> LlmError {
        let status = response.status();

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate limit exceeded");
                LlmError::RateLimit
            }
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed");
                LlmError::Unauthorized
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                LlmError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}
