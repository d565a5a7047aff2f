use super::http_utils::{self, send_json_request};
use super::payload::redact_payload;
use super::{ChatMessage, LlmError, VisionProvider};
use crate::config::{Settings, TOP_P};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

/// Body of a non-streaming `chat/completions` request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    temperature: f64,
    top_p: f64,
}

/// LLM provider implementation for Zhipu GLM-4V
pub struct GlmProvider {
    http_client: HttpClient,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GlmProvider {
    /// Create a new GLM provider from the plugin settings
    ///
    /// # Errors
    ///
    /// Returns `LlmError::NetworkError` if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self, LlmError> {
        Ok(Self {
            http_client: http_utils::create_http_client(settings.timeout())?,
            api_base: settings.api.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api.key.clone(),
            model: settings.api.model.clone(),
            temperature: settings.api.temperature,
        })
    }

    fn request<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: false,
            temperature: self.temperature,
            top_p: TOP_P,
        }
    }

    fn log_request(&self, messages: &[ChatMessage]) {
        let redacted = redact_payload(messages);
        match serde_json::to_string(&self.request(&redacted)) {
            Ok(body) => debug!("Request payload: {body}"),
            Err(e) => debug!("Request payload could not be serialized for logging: {e}"),
        }
    }
}

#[async_trait]
impl VisionProvider for GlmProvider {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<Value, LlmError> {
        info!("Sending API request to {}", self.api_base);
        self.log_request(messages);

        let url = format!("{}/chat/completions", self.api_base);
        match send_json_request(&self.http_client, &url, &self.request(messages), &self.api_key)
            .await
        {
            Ok(response) => {
                info!("Received API response successfully");
                Ok(response)
            }
            Err(e) => {
                error!("API call error: {e}");
                Err(e)
            }
        }
    }
}
