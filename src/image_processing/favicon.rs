use anyhow::{anyhow, Context, Result};
use image::codecs::ico::IcoEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ensure_parent_dir, open_image, resize::resize_exact, ColorMode};

pub const DEFAULT_FAVICON_SIZE: u32 = 64;

/// ICO directory entries store dimensions in a single byte (0 means 256)
pub const MAX_FAVICON_SIZE: u32 = 256;

#[derive(Debug, Clone)]
pub struct FaviconResult {
    pub output_path: PathBuf,
    pub original_mode: ColorMode,
    pub original_dimensions: (u32, u32),
    pub size: u32,
    /// Bytes written to `output_path`
    pub output_size: u64,
}

/// Convert a PNG into a square RGBA favicon and write it as ICO
pub fn convert_to_favicon(input_path: &Path, output_path: &Path, size: u32) -> Result<FaviconResult> {
    if size == 0 || size > MAX_FAVICON_SIZE {
        return Err(anyhow!(
            "Favicon size must be between 1 and {} pixels, got: {}",
            MAX_FAVICON_SIZE,
            size
        ));
    }

    let img = open_image(input_path)?;
    let original_mode = ColorMode::from(img.color());
    let original_dimensions = (img.width(), img.height());

    // Always work in RGBA so the icon carries an alpha channel
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let icon = resize_exact(&rgba, size, size)?.to_rgba8();

    let mut bytes = Vec::new();
    IcoEncoder::new(&mut bytes)
        .write_image(icon.as_raw(), size, size, ExtendedColorType::Rgba8)
        .context("Failed to encode ICO")?;

    ensure_parent_dir(output_path)?;
    fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to save ICO: {}", output_path.display()))?;

    Ok(FaviconResult {
        output_path: output_path.to_path_buf(),
        original_mode,
        original_dimensions,
        size,
        output_size: bytes.len() as u64,
    })
}
