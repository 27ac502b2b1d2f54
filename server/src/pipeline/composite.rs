//! Decode, overlay compositing, and PNG encoding
//!
//! CPU-bound pixel work, no I/O. The overlay always covers the decoded
//! dimensions of the source exactly; there is no fixed canvas size.

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};

use crate::overlay::{BlendMode, OverlayPlan};

use super::types::PipelineError;

/// Decode raster image bytes into RGBA8
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| PipelineError::DecodeFailed(e.to_string()))?;
    Ok(image.into_rgba8())
}

/// Composite a full-canvas flat-color overlay onto the image in place.
///
/// The overlay layer has the plan's fill color at the plan's alpha and is
/// combined per the plan's blend mode, source image as base. A solid-fill
/// plan (intensity 100) replaces every pixel with the opaque fill color.
pub fn apply_overlay(image: &mut RgbaImage, plan: &OverlayPlan) {
    if plan.is_solid_fill() {
        let fill = Rgba([plan.fill[0], plan.fill[1], plan.fill[2], 255]);
        for pixel in image.pixels_mut() {
            *pixel = fill;
        }
        return;
    }

    let alpha = plan.alpha;
    if alpha <= 0.0 {
        return;
    }

    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let src = [r, g, b];
        let mut out = [0u8; 3];

        for c in 0..3 {
            let s = src[c] as f32;
            let top = match plan.blend {
                BlendMode::Normal => plan.fill[c] as f32,
                BlendMode::Multiply => s * plan.fill[c] as f32 / 255.0,
            };
            out[c] = (s * (1.0 - alpha) + top * alpha).round() as u8;
        }

        // Source-over on the alpha channel
        let src_alpha = a as f32 / 255.0;
        let out_alpha = alpha + src_alpha * (1.0 - alpha);

        *pixel = Rgba([out[0], out[1], out[2], (out_alpha * 255.0).round() as u8]);
    }
}

/// Encode RGBA8 to PNG. Lossless: decoding the output yields the exact
/// input pixel values.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| PipelineError::EncodeFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::ColorName;

    fn test_image() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| {
            Rgba([(x * 60) as u8, (y * 60) as u8, 128, 255])
        })
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::DecodeFailed(_)));
    }

    #[test]
    fn test_zero_intensity_is_a_no_op() {
        let plan = OverlayPlan::build(ColorName::Pink, 0).unwrap();
        let original = test_image();
        let mut composited = original.clone();
        apply_overlay(&mut composited, &plan);
        assert_eq!(original.as_raw(), composited.as_raw());
    }

    #[test]
    fn test_full_intensity_is_flat_fill() {
        let plan = OverlayPlan::build(ColorName::Blue, 100).unwrap();
        let mut image = test_image();
        apply_overlay(&mut image, &plan);
        for pixel in image.pixels() {
            assert_eq!(*pixel, Rgba([0x00, 0x00, 0xFF, 255]));
        }
    }

    #[test]
    fn test_multiply_darkens_and_preserves_saturated_channels() {
        // Pink's red channel is 255, so multiply leaves red untouched
        // while the other channels darken.
        let plan = OverlayPlan::build(ColorName::Pink, 40).unwrap();
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        apply_overlay(&mut image, &plan);
        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[0], 100);
        assert!(pixel[1] < 100);
        assert!(pixel[2] < 100);
    }

    #[test]
    fn test_normal_blend_moves_toward_fill() {
        let plan = OverlayPlan::build(ColorName::Red, 75).unwrap();
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        apply_overlay(&mut image, &plan);
        let pixel = image.get_pixel(0, 0);
        assert!(pixel[0] > 0, "red channel should move toward the fill");
        assert_eq!(pixel[1], 0);
        assert_eq!(pixel[2], 0);
    }

    #[test]
    fn test_png_round_trip_is_pixel_identical() {
        let plan = OverlayPlan::build(ColorName::Gold, 60).unwrap();
        let mut image = test_image();
        apply_overlay(&mut image, &plan);

        let png = encode_png(&image).unwrap();
        let decoded = decode(&png).unwrap();
        assert_eq!(image.as_raw(), decoded.as_raw());
    }

    #[test]
    fn test_overlay_covers_source_dimensions() {
        let plan = OverlayPlan::build(ColorName::Green, 100).unwrap();
        let mut image = RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 255]));
        apply_overlay(&mut image, &plan);
        assert_eq!(image.dimensions(), (7, 3));
        assert_eq!(*image.get_pixel(6, 2), Rgba([0x00, 0x80, 0x00, 255]));
    }
}
