//! Testing helpers and mock utilities.
//!
//! Provides sample settings, in-memory images and canned provider responses.

use crate::config::Settings;
use crate::llm::{LlmError, MockVisionProvider};
use bytes::Bytes;
use image::{ImageFormat, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

/// Settings with a 1 MB / 64 px image limit pointing at `base_url`.
///
/// # Panics
///
/// Panics if the sample document stops matching the settings schema.
#[must_use]
pub fn sample_settings(base_url: &str, timeout_secs: f64) -> Settings {
    let json = json!({
        "api": {
            "base_url": base_url,
            "model": "glm-4v-plus",
            "key": "test-key",
            "timeout": timeout_secs
        },
        "image": {"max_size": 1, "max_pixels": 64},
        "video": {"max_size": 20, "max_duration": 30}
    });
    Settings::from_json_str(&json.to_string()).expect("valid sample settings")
}

/// Shared sample settings for handler tests
#[must_use]
pub fn shared_settings() -> Arc<Settings> {
    Arc::new(sample_settings("http://localhost", 5.0))
}

/// A black PNG of the given size.
///
/// # Panics
///
/// Panics if the PNG encoder fails.
#[must_use]
pub fn png(width: u32, height: u32) -> Bytes {
    let mut buf = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode test png");
    Bytes::from(buf.into_inner())
}

/// A 1x1 PNG whose header claims `width` x `height`.
///
/// The pixel data stays 1x1, so only header readers accept it.
#[must_use]
pub fn png_with_dimensions(width: u32, height: u32) -> Bytes {
    // signature (8) | IHDR length (4) | "IHDR" (4) | data (13) | crc (4)
    let mut bytes = png(1, 1).to_vec();
    bytes[16..20].copy_from_slice(&width.to_be_bytes());
    bytes[20..24].copy_from_slice(&height.to_be_bytes());
    let crc = crc32(&bytes[12..29]);
    bytes[29..33].copy_from_slice(&crc.to_be_bytes());
    Bytes::from(bytes)
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = u32::MAX;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// A chat-completion response whose first choice says `text`
#[must_use]
pub fn completion(text: &str) -> Value {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]})
}

/// Create a mock provider that fails every call with `LlmError::Timeout`.
#[must_use]
pub fn mock_provider_timeout() -> MockVisionProvider {
    let mut mock = MockVisionProvider::new();
    mock.expect_chat_completion()
        .returning(|_| Err(LlmError::Timeout));
    mock
}
