//! HTTP client implementing [`GenerationDriver`] against an OpenAI-compatible API.

use std::time::Duration;

use async_trait::async_trait;
use folio_core::{Dimensions, Role};
use folio_error::{ConfigError, ConfigErrorKind, GenerationError, GenerationResult};
use folio_interface::GenerationDriver;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::config::OpenAiConfig;
use super::dto::{
    ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, provider_message,
};

/// OpenAI generation client.
///
/// Each call is a single request with no retry. Non-success statuses become
/// provider errors, network failures become transport errors, and bodies of
/// the wrong shape become protocol errors.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Build a client with the configured timeout.
    pub fn new(config: OpenAiConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Client(e.to_string())))?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Send a request and read the body, mapping HTTP-level failures.
    async fn send(&self, request: reqwest::RequestBuilder) -> GenerationResult<(StatusCode, String)> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status.is_client_error() || status.is_server_error() {
            let message = provider_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.clone()
                }
            });
            warn!(status = status.as_u16(), %message, "Provider rejected request");
            return Err(GenerationError::provider(status.as_u16(), message));
        }

        Ok((status, body))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> GenerationResult<(StatusCode, R)>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.config.endpoint(path))
            .bearer_auth(self.config.api_key())
            .json(body);
        let (status, text) = self.send(request).await?;
        let parsed = serde_json::from_str::<R>(&text).map_err(|e| {
            // A provider may report failures with a 200 and an error envelope.
            match provider_message(&text) {
                Some(message) => GenerationError::provider(status.as_u16(), message),
                None => GenerationError::protocol(format!("Unexpected response body: {}", e)),
            }
        })?;
        Ok((status, parsed))
    }
}

fn transport(error: reqwest::Error) -> GenerationError {
    GenerationError::transport(error.to_string())
}

#[async_trait]
impl GenerationDriver for OpenAiClient {
    #[instrument(
        name = "openai_complete_text",
        skip(self, system_role, user_prompt),
        fields(model = %self.config.text_model(), prompt_len = user_prompt.len())
    )]
    async fn complete_text(&self, system_role: &str, user_prompt: &str) -> GenerationResult<String> {
        let request = ChatRequest {
            model: self.config.text_model(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_role,
                },
                ChatMessage {
                    role: Role::User,
                    content: user_prompt,
                },
            ],
        };

        let (status, response) = self
            .post_json::<_, ChatResponse>("chat/completions", &request)
            .await?;

        if let Some(error) = response.error {
            return Err(GenerationError::provider(status.as_u16(), error.into_message()));
        }

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::protocol("Response contained no message content"))?;

        debug!(response_len = content.len(), "Text completion received");
        Ok(content)
    }

    #[instrument(
        name = "openai_generate_image",
        skip(self, prompt),
        fields(model = %self.config.image_model(), size = %size)
    )]
    async fn generate_image(&self, prompt: &str, size: Dimensions) -> GenerationResult<String> {
        let request = ImageRequest {
            model: self.config.image_model(),
            prompt,
            n: 1,
            size: size.to_string(),
            quality: self.config.image_quality(),
            style: self.config.image_style(),
            response_format: "url",
        };

        let (status, response) = self
            .post_json::<_, ImageResponse>("images/generations", &request)
            .await?;

        if let Some(error) = response.error {
            return Err(GenerationError::provider(status.as_u16(), error.into_message()));
        }

        let url = response
            .data
            .into_iter()
            .next()
            .and_then(|datum| datum.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| GenerationError::protocol("Response contained no image URL"))?;

        debug!("Image URL received");
        Ok(url)
    }

    #[instrument(name = "openai_fetch_bytes", skip(self, url))]
    async fn fetch_bytes(&self, url: &str) -> GenerationResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            return Err(GenerationError::provider(status.as_u16(), message));
        }
        let bytes = response.bytes().await.map_err(transport)?;
        debug!(bytes = bytes.len(), "Fetched remote bytes");
        Ok(bytes.to_vec())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
