//! Azure OpenAI chat-completions provider
//!
//! Sends one extraction prompt per chunk to a model deployment and parses the
//! JSON entity list out of the assistant message.

use super::prompt::build_prompt;
use super::response::parse_entities;
use super::{EntityRecognitionProvider, RecognitionRequest, RecognitionResponse, TokenUsage};
use crate::config::ProviderConfig;
use crate::domain::{ProviderError, RadactError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Azure OpenAI provider
///
/// # Example
///
/// ```no_run
/// use radact::adapters::provider::AzureOpenAiProvider;
/// use radact::config::{secret_string, ProviderConfig};
///
/// # fn example() -> radact::domain::Result<()> {
/// let config = ProviderConfig::new(
///     "https://my-resource.openai.azure.com",
///     secret_string("api-key"),
/// );
/// let provider = AzureOpenAiProvider::new(config)?;
/// # Ok(())
/// # }
/// ```
pub struct AzureOpenAiProvider {
    /// HTTP client for making requests
    client: Client,

    /// Provider configuration
    config: ProviderConfig,

    /// Name used in logs and telemetry
    name: String,
}

impl AzureOpenAiProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                RadactError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let name = format!("azure-openai/{}", config.deployment);

        Ok(Self {
            client,
            config,
            name,
        })
    }

    /// Chat completions URL for the configured deployment
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    /// Retry a request with exponential backoff
    ///
    /// Only retryable provider errors (connection, timeout, 429, 5xx) are
    /// retried; everything else is returned immediately.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let retryable = matches!(e, RadactError::Provider(ref p) if p.is_retryable());
                    if !retryable || attempt >= retry.max_retries {
                        return Err(e);
                    }
                    attempt += 1;

                    let delay_ms = (retry.initial_delay_ms as f64
                        * retry.backoff_multiplier.powi(attempt as i32 - 1))
                    .min(retry.max_delay_ms as f64) as u64;

                    tracing::warn!(
                        provider = %self.name,
                        attempt = attempt,
                        max_retries = retry.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying provider request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn send_chat(&self, prompt: &str) -> Result<ChatResponse> {
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .client
            .post(self.completions_url())
            .header("api-key", self.config.api_key.expose_secret().as_str())
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(map_status(status, message).into());
        }

        resp.json::<ChatResponse>().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to decode chat response: {e}")).into()
        })
    }
}

fn map_send_error(err: reqwest::Error) -> RadactError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string()).into()
    } else {
        ProviderError::ConnectionFailed(err.to_string()).into()
    }
}

fn map_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationFailed(format!("status {status}: {message}"))
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        s if s.is_server_error() => ProviderError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => ProviderError::ClientError {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl EntityRecognitionProvider for AzureOpenAiProvider {
    async fn recognize(&self, request: &RecognitionRequest<'_>) -> Result<RecognitionResponse> {
        let prompt = build_prompt(
            request.text,
            request.categories,
            request.confidence_threshold,
        );

        let response = self.retry_request(|| self.send_chat(&prompt)).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("chat response has no message content".to_string())
            })?;

        let entities = parse_entities(&content)?;
        let usage = response
            .usage
            .map(|u| TokenUsage::single(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_else(|| TokenUsage::single(0, 0));

        tracing::debug!(
            provider = %self.name,
            entities = entities.len(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Provider recognition complete"
        );

        Ok(RecognitionResponse { entities, usage })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn provider(endpoint: &str) -> AzureOpenAiProvider {
        let config = ProviderConfig::new(endpoint, secret_string("test-key"));
        AzureOpenAiProvider::new(config).unwrap()
    }

    #[test]
    fn test_completions_url() {
        let provider = provider("https://my-resource.openai.azure.com/");
        assert_eq!(
            provider.completions_url(),
            "https://my-resource.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-02-01"
        );
        assert_eq!(provider.name(), "azure-openai/gpt-4o-mini");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ProviderError::RateLimitExceeded(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, String::new()),
            ProviderError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, String::new()),
            ProviderError::ClientError { status: 400, .. }
        ));
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "find PII",
            }],
            temperature: 0.5,
            max_tokens: 100,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "find PII");
        assert_eq!(json["max_tokens"], 100);
    }
}
