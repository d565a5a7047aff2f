use serde::Serialize;

/// Prompt sent alongside an image
pub const IMAGE_PROMPT: &str = "请描述这张图片";
/// Prompt sent alongside a video
pub const VIDEO_PROMPT: &str = "请描述这个视频";
/// Placeholder replacing image URLs in logged payloads
pub const IMAGE_URL_PLACEHOLDER: &str = "[IMAGE_URL]";
/// Placeholder replacing video URLs in logged payloads
pub const VIDEO_URL_PLACEHOLDER: &str = "[VIDEO_URL]";

/// Kind of media a message asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Fixed prompt text paired with this media kind
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Image => IMAGE_PROMPT,
            Self::Video => VIDEO_PROMPT,
        }
    }

    const fn placeholder(self) -> &'static str {
        match self {
            Self::Image => IMAGE_URL_PLACEHOLDER,
            Self::Video => VIDEO_URL_PLACEHOLDER,
        }
    }
}

/// `{"url": ...}` wrapper used by media blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaUrl {
    pub url: String,
}

/// One typed unit of a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    ImageUrl { image_url: MediaUrl },
    VideoUrl { video_url: MediaUrl },
    Text { text: String },
}

impl ContentBlock {
    /// Media block of the given kind pointing at `url`
    #[must_use]
    pub fn media(kind: MediaKind, url: impl Into<String>) -> Self {
        let media = MediaUrl { url: url.into() };
        match kind {
            MediaKind::Image => Self::ImageUrl { image_url: media },
            MediaKind::Video => Self::VideoUrl { video_url: media },
        }
    }

    fn redacted(&self) -> Self {
        match self {
            Self::ImageUrl { .. } => Self::media(MediaKind::Image, MediaKind::Image.placeholder()),
            Self::VideoUrl { .. } => Self::media(MediaKind::Video, MediaKind::Video.placeholder()),
            Self::Text { text } => Self::Text { text: text.clone() },
        }
    }
}

/// A chat message in the upstream request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

impl ChatMessage {
    /// Copy of the message with every media URL replaced by a placeholder
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            role: self.role.clone(),
            content: self.content.iter().map(ContentBlock::redacted).collect(),
        }
    }
}

/// Build the single-message payload asking the model to describe `media_url`.
///
/// # Examples
///
/// ```
/// use glm_vision::llm::payload::{build_payload, IMAGE_PROMPT};
/// use glm_vision::llm::{ContentBlock, MediaKind};
///
/// let payload = build_payload(MediaKind::Image, "https://example.com/cat.png");
/// assert_eq!(payload.len(), 1);
/// assert_eq!(payload[0].content[1], ContentBlock::Text { text: IMAGE_PROMPT.to_string() });
/// ```
#[must_use]
pub fn build_payload(kind: MediaKind, media_url: &str) -> Vec<ChatMessage> {
    vec![ChatMessage {
        role: "user".to_string(),
        content: vec![
            ContentBlock::media(kind, media_url),
            ContentBlock::Text {
                text: kind.prompt().to_string(),
            },
        ],
    }]
}

/// Redacted clone of a payload, for logging only
#[must_use]
pub fn redact_payload(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages.iter().map(ChatMessage::redacted).collect()
}
