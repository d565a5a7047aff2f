//! Multimodal LLM client
//!
//! Request payload types, the HTTP plumbing and the GLM-4V provider.

mod http_utils;
/// Chat-completion request payload and its redacted logging clone
pub mod payload;
/// GLM-4V (Zhipu `chat/completions`) provider
pub mod providers;

pub use http_utils::{extract_reply, REPLY_FALLBACK};
pub use payload::{ChatMessage, ContentBlock, MediaKind, MediaUrl};
pub use providers::GlmProvider;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling the upstream API
#[derive(Debug, Error)]
pub enum LlmError {
    /// The API answered with a status other than 200
    #[error("API调用失败: {status} - {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The request did not finish within the configured timeout
    #[error("API请求超时")]
    Timeout,
    /// Error during network communication
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Interface for vision-capable chat-completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send the messages and return the parsed JSON response body.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Timeout` when the call exceeds the timeout, `LlmError::ApiError`
    /// on any status other than 200, `LlmError::NetworkError` on other transport failures
    /// and `LlmError::JsonError` if the body is not JSON.
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<Value, LlmError>;
}
