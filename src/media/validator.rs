use super::MediaError;
use crate::config::ImageSettings;
use image::{ImageError, ImageReader};
use std::io::Cursor;
use tracing::error;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Size and dimension gate for downloaded images
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_size_mb: f64,
    max_pixels: u32,
}

impl ImageValidator {
    #[must_use]
    pub fn new(max_size_mb: f64, max_pixels: u32) -> Self {
        Self {
            max_size_mb,
            max_pixels,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ImageSettings) -> Self {
        Self::new(settings.max_size, settings.max_pixels)
    }

    /// Check `bytes` against the limits and hand back `source_url` unchanged.
    ///
    /// The pixel limit applies to the longer edge, not to the pixel count.
    /// Only the image header is read; the pixel data is never decoded.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::SizeExceeded`, `MediaError::Decode` or
    /// `MediaError::DimensionExceeded`, checked in that order.
    pub fn validate_image(&self, bytes: &[u8], source_url: &str) -> Result<String, MediaError> {
        self.check(bytes).map_err(|e| {
            error!("Image processing error: {e}");
            e
        })?;
        Ok(source_url.to_string())
    }

    fn check(&self, bytes: &[u8]) -> Result<(), MediaError> {
        #[allow(clippy::cast_precision_loss)]
        let size_mb = bytes.len() as f64 / BYTES_PER_MB;
        if size_mb > self.max_size_mb {
            return Err(MediaError::SizeExceeded {
                size_mb,
                limit_mb: self.max_size_mb,
            });
        }

        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(ImageError::from)?
            .into_dimensions()?;
        let dimension = width.max(height);
        if dimension > self.max_pixels {
            return Err(MediaError::DimensionExceeded {
                dimension,
                limit: self.max_pixels,
            });
        }
        Ok(())
    }
}
