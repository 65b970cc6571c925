pub mod compress;
pub mod favicon;
pub mod report;
pub mod resize;

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder};
use std::fs;
use std::path::{Path, PathBuf};

/// Colour mode of a decoded bitmap, reduced to the cases the commands care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L,
    La,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::La | ColorMode::Rgba)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::L,
            ColorType::La8 | ColorType::La16 => ColorMode::La,
            c if c.has_alpha() => ColorMode::Rgba,
            _ => ColorMode::Rgb,
        }
    }
}

/// Basic facts about an input file, captured before any mutation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub file_size: u64,
}

/// Open and decode an image, attaching the path to any failure
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))
}

/// Open an image and collect its dimensions, mode and on-disk size
pub fn open_with_info(path: &Path) -> Result<(DynamicImage, ImageInfo)> {
    let img = open_image(path)?;
    let file_size = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .len();

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        mode: img.color().into(),
        file_size,
    };
    Ok((img, info))
}

/// Create the parent directory of an output path if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

/// Encode an image as PNG with maximum zlib effort and adaptive row filters
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
        .context("Failed to encode PNG")?;
    Ok(buffer)
}

/// Losslessly re-optimize PNG bytes; returns the input unchanged if oxipng rejects it
pub fn optimize_png(data: Vec<u8>) -> Vec<u8> {
    let options = oxipng::Options::from_preset(2);
    match oxipng::optimize_from_memory(&data, &options) {
        Ok(optimized) if optimized.len() < data.len() => optimized,
        _ => data,
    }
}

/// Write an image as PNG and return the number of bytes written
pub fn save_png(img: &DynamicImage, path: &Path, optimize: bool) -> Result<u64> {
    let mut data = encode_png(img)?;
    if optimize {
        data = optimize_png(data);
    }

    ensure_parent_dir(path)?;
    fs::write(path, &data).with_context(|| format!("Failed to save PNG: {}", path.display()))?;
    Ok(data.len() as u64)
}

/// Return `path` with a `.png` extension unless it already has one
pub fn png_output_path(path: &Path) -> PathBuf {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    }
}
