use crate::config::{IMAGE_KEYWORDS, VIDEO_KEYWORDS};
use crate::llm::MediaKind;
use lazy_regex::lazy_regex;

static RE_MEDIA_URL: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#);

/// Classify a message by its trigger keywords.
///
/// Image keywords win when both kinds are present.
///
/// # Examples
///
/// ```
/// use glm_vision::llm::MediaKind;
/// use glm_vision::plugin::trigger::classify;
///
/// assert_eq!(classify("看图 https://a.com/x.png"), Some(MediaKind::Image));
/// assert_eq!(classify("hello"), None);
/// ```
#[must_use]
pub fn classify(text: &str) -> Option<MediaKind> {
    let contains_any = |keywords: &[&str]| keywords.iter().any(|kw| text.contains(kw));

    if contains_any(IMAGE_KEYWORDS) {
        Some(MediaKind::Image)
    } else if contains_any(VIDEO_KEYWORDS) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// First `http(s)://` or `www.` token in the text
#[must_use]
pub fn extract_first_url(text: &str) -> Option<&str> {
    RE_MEDIA_URL.find(text).map(|m| m.as_str())
}
