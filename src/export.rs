//! Export-time resizing of slide images.
//!
//! Export is best-effort per slot: if decoding, resizing or encoding fails,
//! the original bytes are submitted unchanged so one bad image never fails a
//! whole save.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::config::ExportConfig;
use crate::draft::QualityPreset;
use crate::error::{CoverError, CoverResult};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Largest side a baseline JPEG can hold.
const JPEG_MAX_SIDE: u32 = u16::MAX as u32;

/// Pixel budget is `cap * cap * ratio`, leaving room for tall portrait shots.
const BUDGET_ASPECT_RATIO: u64 = 2;

/// An image ready to attach to the save payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Pixel size when known.
    pub dimensions: Option<(u32, u32)>,
    /// False when the original bytes were passed through.
    pub transcoded: bool,
}

impl ExportedImage {
    fn passthrough(bytes: Vec<u8>) -> Self {
        let mime = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_MIME);
        Self {
            bytes,
            mime,
            dimensions: None,
            transcoded: false,
        }
    }

    /// File extension matching the mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

/// Resizes and re-encodes slide images according to a [`QualityPreset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Width the preset resizes to on this platform, or `None` for
    /// pass-through.
    pub fn target_width(&self, preset: QualityPreset) -> Option<u32> {
        preset
            .target_width()
            .map(|width| width.min(self.config.width_cap()))
    }

    /// Resizes `source` to the preset's width (aspect preserved) and encodes
    /// it as JPEG. `Original` and any failure return `source` untouched.
    pub fn upscale(&self, source: Vec<u8>, preset: QualityPreset) -> ExportedImage {
        let Some(target) = self.target_width(preset) else {
            return ExportedImage::passthrough(source);
        };
        match self.transcode(&source, target) {
            Ok(exported) => exported,
            Err(err) => {
                tracing::warn!(
                    %err,
                    preset = preset.as_str(),
                    "export failed, sending original image"
                );
                ExportedImage::passthrough(source)
            }
        }
    }

    fn transcode(&self, source: &[u8], target_width: u32) -> CoverResult<ExportedImage> {
        let img =
            image::load_from_memory(source).map_err(|e| CoverError::Transcode(e.to_string()))?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 || target_width == 0 {
            return Err(CoverError::Transcode(format!(
                "cannot resize {width}x{height} to width {target_width}"
            )));
        }

        let budget = u64::from(self.config.width_cap()).pow(2) * BUDGET_ASPECT_RATIO;
        let (target_width, target_height) =
            fit_dimensions(width, height, target_width, budget);
        let resized = img.resize_exact(target_width, target_height, FilterType::Lanczos3);
        let bytes = encode_jpeg(&resized, self.config.jpeg_quality)?;

        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = target_width,
            to_height = target_height,
            size = bytes.len(),
            "slide image exported"
        );

        Ok(ExportedImage {
            bytes,
            mime: "image/jpeg",
            dimensions: Some((target_width, target_height)),
            transcoded: true,
        })
    }
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = f64::from(height) * f64::from(target_width) / f64::from(width);
    (scaled.round() as u32).max(1)
}

/// Output size for resizing to `target_width`, shrunk on both axes when the
/// result would exceed the pixel budget or the JPEG side limit.
fn fit_dimensions(width: u32, height: u32, target_width: u32, pixel_budget: u64) -> (u32, u32) {
    let target_height = scaled_height(width, height, target_width);
    let pixels = u64::from(target_width) * u64::from(target_height);
    if pixels <= pixel_budget && target_width.max(target_height) <= JPEG_MAX_SIDE {
        return (target_width, target_height);
    }

    let side = f64::from(JPEG_MAX_SIDE) / f64::from(target_width.max(target_height));
    let area = (pixel_budget as f64 / pixels as f64).sqrt();
    let fitted_width = ((f64::from(target_width) * side.min(area)).floor() as u32).max(1);
    let fitted_height = scaled_height(width, height, fitted_width).min(JPEG_MAX_SIDE);
    (fitted_width, fitted_height)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> CoverResult<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&img.to_rgb8())
        .map_err(|e| CoverError::Transcode(e.to_string()))?;
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
