//! Embedded-payload decode and WebP re-encode.

use std::io::Cursor;
use std::path::Path;

use image::{ImageError, ImageFormat};

/// Decode `bytes` as a raster image and re-encode it as WebP at `target`.
///
/// The source encoding is sniffed from the payload. Encoding happens fully
/// in memory before any disk write, so a failed payload never leaves a
/// partial artifact behind.
pub fn transcode_to_webp(bytes: &[u8], target: &Path) -> Result<(), ImageError> {
    let decoded = image::load_from_memory(bytes)?;

    // The WebP encoder accepts 8-bit RGB and RGBA buffers only.
    let mut encoded = Vec::new();
    if decoded.color().has_alpha() {
        decoded
            .to_rgba8()
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::WebP)?;
    } else {
        decoded
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::WebP)?;
    }

    std::fs::write(target, &encoded).map_err(ImageError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png_payload() -> Vec<u8> {
        let raster = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 40, 40]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(raster)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn valid_payload_is_reencoded_as_webp() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("artifact.webp");

        transcode_to_webp(&png_payload(), &target).unwrap();

        let written = std::fs::read(&target).unwrap();
        let reloaded = image::load_from_memory_with_format(&written, ImageFormat::WebP)
            .unwrap()
            .to_rgb8();
        assert_eq!(reloaded.width(), 2);
        assert_eq!(reloaded.height(), 2);
    }

    #[test]
    fn undecodable_payload_writes_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("artifact.webp");

        let result = transcode_to_webp(b"definitely not an image", &target);
        assert!(result.is_err());
        assert!(!target.exists());
    }
}
