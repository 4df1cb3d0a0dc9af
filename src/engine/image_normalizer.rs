//! Shrinks screenshots before upload so they stay under the vision API's
//! size ceiling: wide images are scaled down to a maximum width and
//! everything is re-encoded as JPEG.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::engine::error::ImageNormalizeError;

pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub max_width: u32,
    /// 0.0 ..= 1.0
    pub quality: f32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            quality: 0.82,
        }
    }
}

impl NormalizeOptions {
    fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    /// Payload without the `data:` prefix, as the parse endpoint expects.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// RGBA pixels small enough to show as a thumbnail.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Output size for an image of `width` x `height`: unchanged when it fits,
/// otherwise `max_width` wide with the aspect ratio kept.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }

    let scaled = (f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32;
    (max_width, scaled.max(1))
}

pub fn normalize(
    source: &[u8],
    options: &NormalizeOptions,
) -> Result<NormalizedImage, ImageNormalizeError> {
    let decoded = image::load_from_memory(source).map_err(ImageNormalizeError::Decode)?;
    let (src_width, src_height) = decoded.dimensions();
    let (width, height) = target_dimensions(src_width, src_height, options.max_width);

    let resized = if (width, height) == (src_width, src_height) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, options.jpeg_quality()))
        .map_err(ImageNormalizeError::Encode)?;

    debug!(
        src_width,
        src_height,
        width,
        height,
        size = bytes.len(),
        "screenshot normalized"
    );

    Ok(NormalizedImage {
        bytes,
        width,
        height,
    })
}

/// Decode a thumbnail that fits in a `max_side` square.
pub fn preview(source: &[u8], max_side: u32) -> Result<PreviewImage, ImageNormalizeError> {
    let decoded = image::load_from_memory(source).map_err(ImageNormalizeError::Decode)?;
    let thumb = decoded.thumbnail(max_side, max_side).to_rgba8();

    Ok(PreviewImage {
        width: thumb.width(),
        height: thumb.height(),
        rgba: thumb.into_raw(),
    })
}

/// Accept `data:<mime>;base64,<payload>` and return the raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageNormalizeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageNormalizeError::InvalidDataUri("missing `data:` prefix".into()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageNormalizeError::InvalidDataUri("missing `,` separator".into()))?;

    if !header.ends_with(";base64") {
        return Err(ImageNormalizeError::InvalidDataUri(
            "only base64 payloads are supported".into(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageNormalizeError::InvalidDataUri(e.to_string()))
}
