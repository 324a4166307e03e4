use image::{DynamicImage, codecs::avif::AvifEncoder};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum TranscodeError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Re-encodes an uploaded image into the format served back to the browser.
pub(crate) trait ImageTranscoder: Send + Sync + 'static {
    fn content_type(&self) -> &'static str;

    /// CPU-bound; call from a blocking thread.
    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}

/// PNG or JPEG in, AVIF out.
pub(crate) struct AvifTranscoder {
    /// 1 (slowest, smallest) to 10 (fastest)
    speed: u8,
    /// 1 to 100
    quality: u8,
}

impl Default for AvifTranscoder {
    fn default() -> Self {
        Self {
            speed: 8,
            quality: 80,
        }
    }
}

impl ImageTranscoder for AvifTranscoder {
    fn content_type(&self) -> &'static str {
        "image/avif"
    }

    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let decoded =
            image::load_from_memory(input).map_err(|e| TranscodeError::Decode(e.to_string()))?;
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Decoded upload"
        );

        let mut out = Vec::new();
        let encoder = AvifEncoder::new_with_speed_quality(&mut out, self.speed, self.quality);
        DynamicImage::ImageRgba8(decoded.to_rgba8())
            .write_with_encoder(encoder)
            .map_err(|e| TranscodeError::Encode(e.to_string()))?;

        Ok(out)
    }
}
