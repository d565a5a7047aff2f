//! HTTP utilities for the upstream API
//!
//! Request sending with status/timeout mapping and reply extraction.

use crate::llm::LlmError;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Reply used when the response carries no `choices`
pub const REPLY_FALLBACK: &str = "抱歉，处理失败";

/// Creates an HTTP client whose timeout covers the whole request.
///
/// # Errors
///
/// Returns `LlmError::NetworkError` if the TLS backend cannot be initialised.
pub fn create_http_client(timeout: Duration) -> Result<HttpClient, LlmError> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::NetworkError(e.to_string()))
}

/// Sends a JSON POST with a bearer token and returns the parsed JSON response.
///
/// Only status 200 counts as success; any other status becomes
/// `LlmError::ApiError` carrying the status code and the raw body.
///
/// # Errors
///
/// Returns `LlmError::Timeout` if the request timed out, `LlmError::NetworkError` on other
/// connectivity issues, `LlmError::ApiError` on non-200 statuses, or `LlmError::JsonError`
/// if parsing fails.
pub async fn send_json_request<B: Serialize + Sync>(
    client: &HttpClient,
    url: &str,
    body: &B,
    api_key: &str,
) -> Result<Value, LlmError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.map_err(map_transport_error)?;
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await.map_err(map_transport_error)?;
    serde_json::from_str(&text).map_err(|e| LlmError::JsonError(e.to_string()))
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::NetworkError(e.to_string())
    }
}

/// Extracts `choices[0].message.content` from a chat-completion response.
///
/// A response without a `choices` key yields [`REPLY_FALLBACK`].
///
/// # Example
/// ```ignore
/// let reply = extract_reply(&json!({"choices": [{"message": {"content": "一只猫"}}]}))?;
/// assert_eq!(reply, "一只猫");
/// ```
///
/// # Errors
///
/// Returns `LlmError::JsonError` if `choices` is present but the first entry has no
/// string `message.content`.
pub fn extract_reply(response: &Value) -> Result<String, LlmError> {
    let Some(choices) = response.get("choices") else {
        return Ok(REPLY_FALLBACK.to_string());
    };

    let choice = choices
        .get(0)
        .ok_or_else(|| LlmError::JsonError("Invalid path: missing index 0".to_string()))?;

    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            LlmError::JsonError(format!("Expected string at message.content, got: {choice}"))
        })
}
