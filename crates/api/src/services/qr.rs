//! QR symbol encoding for access codes.

use image::Luma;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// QR encoding errors.
///
/// Unlike the branding chains these propagate: a failed encode must never
/// be replaced by a blank symbol.
#[derive(Debug, Error)]
pub enum QrEncodeError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Encodes access codes into square PNG symbols.
pub struct QrEncoder;

impl QrEncoder {
    /// Encodes `code` verbatim into a `target_px` square PNG.
    ///
    /// Error-correction level M tolerates roughly 15% symbol damage,
    /// which covers creased or lightly damaged printed badges.
    pub fn encode_png(code: &str, target_px: u32) -> Result<Vec<u8>, QrEncodeError> {
        let symbol = QrCode::with_error_correction_level(code.as_bytes(), EcLevel::M)?;

        let rendered = symbol
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(target_px, target_px)
            .build();

        // min_dimensions rounds up to whole modules; snap to the exact
        // requested square.
        let exact = if rendered.dimensions() == (target_px, target_px) {
            rendered
        } else {
            image::imageops::resize(
                &rendered,
                target_px,
                target_px,
                image::imageops::FilterType::Nearest,
            )
        };

        let mut png = Vec::new();
        image::DynamicImage::ImageLuma8(exact)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CODE: &str = "Food Tech Expo0017w0042123456789rnd654321123456789";

    #[test]
    fn test_encode_produces_png() {
        let png = QrEncoder::encode_png(SAMPLE_CODE, 512).unwrap();
        assert_eq!(&png[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_encode_exact_square_dimensions() {
        for px in [512, 600] {
            let png = QrEncoder::encode_png(SAMPLE_CODE, px).unwrap();
            let decoded = image::load_from_memory(&png).unwrap();
            assert_eq!(decoded.width(), px);
            assert_eq!(decoded.height(), px);
        }
    }

    #[test]
    fn test_encode_is_deterministic_for_same_payload() {
        let a = QrEncoder::encode_png(SAMPLE_CODE, 512).unwrap();
        let b = QrEncoder::encode_png(SAMPLE_CODE, 512).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_differs_for_mutated_payload() {
        let a = QrEncoder::encode_png(SAMPLE_CODE, 512).unwrap();
        let mutated = format!("{}X", &SAMPLE_CODE[..SAMPLE_CODE.len() - 1]);
        let b = QrEncoder::encode_png(&mutated, 512).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        // Far beyond QR capacity at level M.
        let oversized = "x".repeat(8000);
        assert!(QrEncoder::encode_png(&oversized, 512).is_err());
    }
}
