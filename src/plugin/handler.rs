//! Keyword-triggered media description
//!
//! Classify the message, pull out the first URL, validate images, then ask the
//! vision model to describe the media and reply with its answer.

use super::trigger::{classify, extract_first_url};
use super::{ContextKind, EventContext, Plugin, PluginInfo};
use crate::config::{Settings, IMAGE_KEYWORDS, VIDEO_KEYWORDS};
use crate::llm::payload::build_payload;
use crate::llm::{extract_reply, GlmProvider, LlmError, MediaKind, VisionProvider};
use crate::media::{HttpFetcher, ImageValidator, MediaError, MediaFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Reply sent when a triggered message carries no URL
pub const MISSING_URL_REPLY: &str = "请提供媒体文件的URL链接";

/// Plugin metadata announced to the host
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: "GLM_vision",
    desc: "GLM-4V视觉模型插件",
    version: "1.0",
    author: "Lingyuzhou",
};

/// Any failure between URL extraction and the final reply
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// The GLM vision plugin
pub struct VisionPlugin {
    settings: Arc<Settings>,
    validator: ImageValidator,
    fetcher: Arc<dyn MediaFetcher>,
    provider: Arc<dyn VisionProvider>,
}

impl VisionPlugin {
    /// Wire the plugin with the HTTP fetcher and the GLM provider.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::NetworkError` if the API client cannot be built.
    pub fn new(settings: Arc<Settings>) -> Result<Self, LlmError> {
        let provider = Arc::new(GlmProvider::new(&settings)?);
        info!(
            "Plugin initialized successfully with model: {}",
            settings.api.model
        );
        Ok(Self::with_components(
            settings,
            Arc::new(HttpFetcher::new()),
            provider,
        ))
    }

    /// Wire the plugin with explicit fetcher and provider implementations
    #[must_use]
    pub fn with_components(
        settings: Arc<Settings>,
        fetcher: Arc<dyn MediaFetcher>,
        provider: Arc<dyn VisionProvider>,
    ) -> Self {
        Self {
            validator: ImageValidator::from_settings(&settings.image),
            settings,
            fetcher,
            provider,
        }
    }

    /// Run the pipeline for one media reference and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns the first download, validation or API failure.
    pub async fn describe(&self, kind: MediaKind, url: &str) -> Result<String, HandlerError> {
        let media_url = match kind {
            MediaKind::Image => {
                let bytes = self.fetcher.fetch(url).await?;
                self.validator.validate_image(&bytes, url)?
            }
            MediaKind::Video => url.to_string(),
        };

        let payload = build_payload(kind, &media_url);
        let response = self.provider.chat_completion(&payload).await?;
        Ok(extract_reply(&response)?)
    }
}

#[async_trait]
impl Plugin for VisionPlugin {
    fn info(&self) -> &PluginInfo {
        &PLUGIN_INFO
    }

    async fn on_handle_context(&self, ctx: &mut EventContext) {
        if ctx.kind != ContextKind::Text {
            return;
        }

        let text = ctx.content.trim();
        let Some(kind) = classify(text) else {
            return;
        };

        let Some(url) = extract_first_url(text).map(ToString::to_string) else {
            ctx.reply_and_break(MISSING_URL_REPLY);
            return;
        };
        info!("Processing URL: {url}");

        let reply = match self.describe(kind, &url).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error processing media: {e}");
                format!("处理失败: {e}")
            }
        };
        ctx.reply_and_break(reply);
    }

    fn help_text(&self) -> String {
        help_text(&self.settings)
    }
}

fn quoted_triggers(keywords: &[&str]) -> String {
    keywords
        .iter()
        .map(|kw| format!("\"{kw} [URL]\""))
        .collect::<Vec<_>>()
        .join("或")
}

/// Usage text listing the triggers and the configured limits
#[must_use]
pub fn help_text(settings: &Settings) -> String {
    format!(
        "智谱AI视觉分析插件使用说明：

1. 分析图片：
   发送{}

2. 分析视频：
   发送{}

图片要求：
- 支持格式：jpg、png、jpeg
- 大小限制：{}MB
- 最大像素：{}像素

视频要求：
- 支持格式：mp4
- 大小限制：{}MB
- 时长限制：{}秒

注意：请确保提供的URL可以直接访问媒体文件",
        quoted_triggers(IMAGE_KEYWORDS),
        quoted_triggers(VIDEO_KEYWORDS),
        settings.image.max_size,
        settings.image.max_pixels,
        settings.video.max_size,
        settings.video.max_duration,
    )
}
