//! Image compression: `DynamicImage` → JPEG bytes at a bounded quality.
//!
//! ## Why JPEG?
//!
//! Rendered document pages are photographs of text as far as an LMS is
//! concerned, and the package is re-downloaded per learner. JPEG at the
//! default quality cuts a rendered page to a fraction of its PNG size while
//! keeping body text legible at 150 DPI.
//!
//! ## Why fail fast on quality?
//!
//! Silently clamping an out-of-range quality would hide a caller bug behind
//! a plausible-looking package. The 1–100 range is validated before any
//! pixel work happens.

use crate::error::Pdf2ScormError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

/// Re-encode a rendered page as JPEG.
///
/// `page` is the 1-based ordinal, used only for error reporting. A failure
/// here aborts the whole packaging run; pages are never dropped silently.
pub fn encode_page(
    img: &DynamicImage,
    page: usize,
    quality: u8,
) -> Result<Vec<u8>, Pdf2ScormError> {
    if !(1..=100).contains(&quality) {
        return Err(Pdf2ScormError::InvalidQuality { quality });
    }

    // JPEG has no alpha channel; pdfium bitmaps come out RGBA.
    let rgb = img.to_rgb8();

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| Pdf2ScormError::EncodingFailed {
            page,
            detail: e.to_string(),
        })?;

    debug!(
        "Encoded page {} ({}x{} px) -> {} bytes at quality {}",
        page,
        img.width(),
        img.height(),
        buf.len(),
        quality
    );

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn test_image() -> DynamicImage {
        // A gradient compresses less degenerately than a solid fill.
        DynamicImage::ImageRgb8(RgbImage::from_fn(120, 80, |x, y| {
            Rgb([(x * 2) as u8, (y * 3) as u8, 128])
        }))
    }

    #[test]
    fn rejects_quality_zero() {
        let err = encode_page(&test_image(), 1, 0).unwrap_err();
        assert!(matches!(err, Pdf2ScormError::InvalidQuality { quality: 0 }));
    }

    #[test]
    fn rejects_quality_above_hundred() {
        let err = encode_page(&test_image(), 1, 101).unwrap_err();
        assert!(matches!(
            err,
            Pdf2ScormError::InvalidQuality { quality: 101 }
        ));
    }

    #[test]
    fn default_quality_beats_raw_baseline() {
        let img = test_image();
        let raw_baseline = (img.width() * img.height() * 3) as usize;

        let jpeg = encode_page(&img, 1, 60).expect("encode should succeed");
        assert!(!jpeg.is_empty());
        assert!(
            jpeg.len() <= raw_baseline,
            "JPEG ({}) should not exceed raw RGB size ({})",
            jpeg.len(),
            raw_baseline
        );
    }

    #[test]
    fn output_is_valid_jpeg() {
        let jpeg = encode_page(&test_image(), 1, 60).unwrap();
        // JPEG SOI marker.
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).expect("decodes as an image");
        assert_eq!(decoded.width(), 120);
        assert_eq!(decoded.height(), 80);
    }

    #[test]
    fn boundary_qualities_accepted() {
        assert!(encode_page(&test_image(), 1, 1).is_ok());
        assert!(encode_page(&test_image(), 1, 100).is_ok());
    }
}
