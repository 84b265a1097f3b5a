//! OpenAI chat-completions backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChatBackend, ChatMessage, ClientError, CompletionRequest, CompletionResponse, Usage};

const OPENAI_API_BASE: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the OpenAI chat-completions API.
///
/// One synchronous request per exchange: no streaming, no retries. The
/// request timeout is the only resilience mechanism and reports a distinct
/// [`ClientError::Timeout`].
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API host (compatible proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ClientError> {
        let body = ApiRequest {
            model: &request.model,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            messages: &request.messages,
        };

        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(match status.as_u16() {
                401 | 403 => ClientError::Auth {
                    status: status.as_u16(),
                },
                429 => ClientError::RateLimited,
                code => ClientError::Api { status: code, message },
            });
        }

        let api_response: ApiResponse = response.json().await?;
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse("response carried no choices".into()))?;

        debug!(
            prompt_tokens = api_response.usage.prompt_tokens,
            completion_tokens = api_response.usage.completion_tokens,
            "completion received"
        );

        Ok(CompletionResponse {
            message: choice.message,
            usage: api_response.usage,
        })
    }
}
