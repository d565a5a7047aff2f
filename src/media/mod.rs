//! Media download and validation
//!
//! Fetches image bytes from a URL and gates them on size and dimension limits
//! before the URL is handed to the upstream API.

/// HTTP media download
pub mod fetcher;
/// Image size and dimension checks
pub mod validator;

pub use fetcher::{HttpFetcher, MediaFetcher};
pub use validator::ImageValidator;

use thiserror::Error;

/// Errors raised while downloading or validating media
#[derive(Debug, Error)]
pub enum MediaError {
    /// The media could not be downloaded
    #[error("{0}")]
    Download(String),
    /// The image is larger than `image.max_size`
    #[error("图片大小超过限制 ({size_mb:.1}MB > {limit_mb}MB)")]
    SizeExceeded {
        /// Measured size in megabytes
        size_mb: f64,
        /// Configured limit in megabytes
        limit_mb: f64,
    },
    /// The longer edge is larger than `image.max_pixels`
    #[error("图片尺寸超过限制 ({dimension} > {limit})")]
    DimensionExceeded {
        /// Measured longer edge in pixels
        dimension: u32,
        /// Configured limit in pixels
        limit: u32,
    },
    /// The bytes are not a decodable image
    #[error(transparent)]
    Decode(#[from] image::ImageError),
}
