use anyhow::{anyhow, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

use super::{open_image, save_png, ColorMode};

/// Outcome of a fixed-size resize
#[derive(Debug, Clone)]
pub struct ResizeResult {
    pub output_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub output_size: u64,
}

/// Compute the dimensions of an image capped to `max_width`
///
/// Images already within the cap are left alone. Wider images are scaled so the
/// width equals the cap and the height follows the original aspect ratio,
/// rounded to the nearest pixel with halves going up (never below 1).
pub fn fit_to_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }

    // Exact integer arithmetic: a float ratio turns x.5 into x.4999...
    let (w, h, cap) = (width as u64, height as u64, max_width as u64);
    let new_height = ((2 * h * cap + w) / (2 * w)).max(1);
    (max_width, new_height as u32)
}

/// Resize an image to exact dimensions with the Lanczos3 filter
///
/// The colour layout is preserved: greyscale stays greyscale, and images with an
/// alpha channel are resampled with alpha-aware weighting.
pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(anyhow!("Target dimensions must be non-zero, got {}x{}", width, height));
    }

    if img.width() == 0 || img.height() == 0 {
        return Err(anyhow!("Source image is empty"));
    }

    if img.width() == width && img.height() == height {
        return Ok(img.clone());
    }

    let mode = ColorMode::from(img.color());
    let (pixel_type, src_pixels) = match mode {
        ColorMode::L => (PixelType::U8, img.to_luma8().into_raw()),
        ColorMode::La => (PixelType::U8x2, img.to_luma_alpha8().into_raw()),
        ColorMode::Rgb => (PixelType::U8x3, img.to_rgb8().into_raw()),
        ColorMode::Rgba => (PixelType::U8x4, img.to_rgba8().into_raw()),
    };

    let dst_pixels = resample(
        src_pixels,
        (img.width(), img.height()),
        (width, height),
        pixel_type,
    )?;

    let resized = match mode {
        ColorMode::L => GrayImage::from_raw(width, height, dst_pixels).map(DynamicImage::ImageLuma8),
        ColorMode::La => {
            GrayAlphaImage::from_raw(width, height, dst_pixels).map(DynamicImage::ImageLumaA8)
        }
        ColorMode::Rgb => RgbImage::from_raw(width, height, dst_pixels).map(DynamicImage::ImageRgb8),
        ColorMode::Rgba => {
            RgbaImage::from_raw(width, height, dst_pixels).map(DynamicImage::ImageRgba8)
        }
    };

    resized.ok_or_else(|| anyhow!("Resized buffer does not match {}x{}", width, height))
}

/// Run fast_image_resize over a packed pixel buffer
fn resample(
    src_pixels: Vec<u8>,
    (src_width, src_height): (u32, u32),
    (dst_width, dst_height): (u32, u32),
    pixel_type: PixelType,
) -> Result<Vec<u8>> {
    let src_image = Image::from_vec_u8(src_width, src_height, src_pixels, pixel_type)?;
    let mut dst_image = Image::new(dst_width, dst_height, pixel_type);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, Some(&options))?;

    Ok(dst_image.into_vec())
}

/// Resize a file to exactly `width`x`height` (aspect ratio is not preserved) and save it as PNG
pub fn resize_to_fixed(
    input_path: &Path,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<ResizeResult> {
    let img = open_image(input_path)?;
    let original_dimensions = (img.width(), img.height());

    let resized = resize_exact(&img, width, height)?;
    let output_size = save_png(&resized, output_path, false)?;

    Ok(ResizeResult {
        output_path: output_path.to_path_buf(),
        original_dimensions,
        width: resized.width(),
        height: resized.height(),
        mode: resized.color().into(),
        output_size,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_fit_to_width_keeps_narrow_images() {
        assert_eq!(fit_to_width(300, 200, 800), (300, 200));
        assert_eq!(fit_to_width(800, 600, 800), (800, 600));
    }

    #[test]
    fn test_fit_to_width_scales_wide_images() {
        assert_eq!(fit_to_width(1600, 900, 800), (800, 450));
        assert_eq!(fit_to_width(1000, 333, 400), (400, 133));
        // 333 * 128 / 1000 = 42.624 rounds up
        assert_eq!(fit_to_width(1000, 333, 128), (128, 43));
        // 999 * 400 / 1200 = 333.0 exactly
        assert_eq!(fit_to_width(1200, 999, 400), (400, 333));
    }

    #[test]
    fn test_fit_to_width_rounds_halves_up() {
        // 45 * 7 / 10 = 31.5
        assert_eq!(fit_to_width(10, 45, 7), (7, 32));
        // 85 * 7 / 10 = 59.5
        assert_eq!(fit_to_width(10, 85, 7), (7, 60));
        // 3 * 1 / 2 = 1.5
        assert_eq!(fit_to_width(2, 3, 1), (1, 2));
    }

    #[test]
    fn test_fit_to_width_matches_exact_rounding() {
        for width in 2..=200u32 {
            for max_width in 1..width {
                for height in [1u32, 7, 45, 99, 250, 399] {
                    let exact = height as f64 * max_width as f64 / width as f64;
                    let expected = (exact.floor() as u32
                        + u32::from(exact - exact.floor() >= 0.5))
                    .max(1);
                    assert_eq!(
                        fit_to_width(width, height, max_width),
                        (max_width, expected),
                        "{}x{} capped at {}",
                        width,
                        height,
                        max_width
                    );
                }
            }
        }
    }

    #[test]
    fn test_fit_to_width_never_collapses_height() {
        assert_eq!(fit_to_width(5000, 1, 100), (100, 1));
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let img = rgb_image(100, 80);
        let resized = resize_exact(&img, 50, 50).unwrap();
        assert_eq!((resized.width(), resized.height()), (50, 50));
        assert_eq!(ColorMode::from(resized.color()), ColorMode::Rgb);
    }

    #[test]
    fn test_resize_exact_preserves_color_mode() {
        let rgba = resize_exact(&rgba_image(40, 40), 10, 20).unwrap();
        assert_eq!(ColorMode::from(rgba.color()), ColorMode::Rgba);

        let luma = resize_exact(&luma_image(40, 40), 10, 20).unwrap();
        assert_eq!(ColorMode::from(luma.color()), ColorMode::L);

        let luma_alpha = resize_exact(&luma_alpha_image(40, 40), 80, 80).unwrap();
        assert_eq!(ColorMode::from(luma_alpha.color()), ColorMode::La);
        assert_eq!((luma_alpha.width(), luma_alpha.height()), (80, 80));
    }

    #[test]
    fn test_resize_exact_same_size_is_identity() {
        let img = rgb_image(32, 32);
        let resized = resize_exact(&img, 32, 32).unwrap();
        assert_eq!(resized.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_resize_exact_rejects_zero_target() {
        let img = rgb_image(32, 32);
        assert!(resize_exact(&img, 0, 10).is_err());
        assert!(resize_exact(&img, 10, 0).is_err());
    }

    #[test]
    fn test_resize_to_fixed_always_500_square() {
        let dir = tempfile::tempdir().unwrap();

        for (name, img) in [
            ("wide.png", rgb_image(1200, 300)),
            ("tall.png", rgba_image(90, 700)),
            ("tiny.png", luma_image(7, 5)),
        ] {
            let input = write_png(dir.path(), name, &img);
            let output = dir.path().join("out").join(name);

            let result = resize_to_fixed(&input, &output, 500, 500).unwrap();
            assert_eq!((result.width, result.height), (500, 500));

            let saved = image::open(&output).unwrap();
            assert_eq!((saved.width(), saved.height()), (500, 500));
        }
    }

    #[test]
    fn test_resize_to_fixed_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        let result = resize_to_fixed(&dir.path().join("missing.png"), &output, 500, 500);
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
