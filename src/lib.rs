//! GLM vision plugin library.
//!
//! Keyword-triggered image and video description for chat bots, backed by the
//! GLM-4V chat-completion API.

/// Configuration management.
pub mod config;
/// Upstream API payloads and client.
pub mod llm;
/// Media download and validation.
pub mod media;
/// Plugin seam and message handler.
pub mod plugin;

#[cfg(test)]
pub mod testing;
