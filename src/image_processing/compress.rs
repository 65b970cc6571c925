//! Web compression of PNG logos
//!
//! Produces one or more size-capped PNG variants from a single input while keeping
//! transparency intact. Output is always lossless PNG; the requested extension is
//! rewritten when it names another format.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::resize::{fit_to_width, resize_exact};
use super::{open_with_info, png_output_path, save_png, ColorMode};

pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// Options for a single compression run
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOptions {
    /// Lossy encoder quality (0-100). Output is always lossless PNG, so this is
    /// validated but otherwise unused.
    pub quality: u8,
    pub max_width: u32,
    /// Run the encoded PNG through oxipng
    pub optimize: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_width: DEFAULT_MAX_WIDTH,
            optimize: true,
        }
    }
}

/// A named size cap; written as `<stem>_<name>.png`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressVariant {
    pub name: String,
    pub max_width: u32,
}

impl CompressVariant {
    pub fn new(name: impl Into<String>, max_width: u32) -> Self {
        Self {
            name: name.into(),
            max_width,
        }
    }

    /// Output file for this variant of `input_path` inside `output_dir`
    pub fn output_path(&self, input_path: &Path, output_dir: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        output_dir.join(format!("{}_{}.png", stem, self.name))
    }
}

/// Web-sized, small and favicon/thumbnail variants
pub fn default_variants() -> Vec<CompressVariant> {
    vec![
        CompressVariant::new("compressed", 800),
        CompressVariant::new("small", 400),
        CompressVariant::new("tiny", 128),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
    pub mode: ColorMode,
    pub original_size: u64,
    pub compressed_size: u64,
    pub resized: bool,
}

impl CompressionReport {
    pub fn has_transparency(&self) -> bool {
        self.mode.has_alpha()
    }

    /// Percentage saved relative to the original, `None` when the original is empty
    pub fn compression_ratio(&self) -> Option<f64> {
        compression_ratio(self.original_size, self.compressed_size)
    }
}

/// `(1 - compressed / original) * 100`, undefined for a zero-byte original
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some((1.0 - compressed_size as f64 / original_size as f64) * 100.0)
}

/// Kilobytes with one decimal, the unit every size diagnostic uses
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Compress a PNG for web use, capping its width and keeping transparency
pub fn compress_png(
    input_path: &Path,
    output_path: &Path,
    options: &CompressOptions,
) -> Result<CompressionReport> {
    if options.quality > 100 {
        return Err(anyhow!(
            "Quality must be between 0 and 100, got: {}",
            options.quality
        ));
    }
    if options.max_width == 0 {
        return Err(anyhow!("Maximum width must be greater than 0"));
    }

    let (img, info) = open_with_info(input_path)?;

    // PNG regardless of the requested extension; for alpha images this is what
    // keeps the transparency
    let output_path = png_output_path(output_path);

    let (width, height) = fit_to_width(info.width, info.height, options.max_width);
    let resized = (width, height) != (info.width, info.height);
    let img = if resized {
        resize_exact(&img, width, height)?
    } else {
        img
    };

    let compressed_size = save_png(&img, &output_path, options.optimize)?;

    Ok(CompressionReport {
        input_path: input_path.to_path_buf(),
        output_path,
        original_dimensions: (info.width, info.height),
        final_dimensions: (width, height),
        mode: info.mode,
        original_size: info.file_size,
        compressed_size,
        resized,
    })
}

/// Result of one variant; failures are captured rather than propagated
#[derive(Debug)]
pub struct VariantOutcome {
    pub variant: CompressVariant,
    pub result: Result<CompressionReport>,
}

/// Run `compress_png` once per variant, in order
///
/// A failing variant does not stop the remaining ones. `progress_callback` is
/// invoked before each variant starts and `completion_callback` after it ends.
pub fn compress_variants<S, F>(
    input_path: &Path,
    output_dir: &Path,
    variants: &[CompressVariant],
    options: &CompressOptions,
    mut progress_callback: S,
    mut completion_callback: F,
) -> Vec<VariantOutcome>
where
    S: FnMut(usize, &CompressVariant),
    F: FnMut(usize, &VariantOutcome),
{
    variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            progress_callback(index, variant);

            let variant_options = CompressOptions {
                max_width: variant.max_width,
                ..options.clone()
            };
            let output_path = variant.output_path(input_path, output_dir);
            let outcome = VariantOutcome {
                variant: variant.clone(),
                result: compress_png(input_path, &output_path, &variant_options),
            };

            completion_callback(index, &outcome);
            outcome
        })
        .collect()
}

/// Compress every variant of `input_path`, refusing to start when it is missing
///
/// A missing input is the only error; nothing is written in that case.
/// Per-variant failures are reported through the returned outcomes.
pub fn compress_file<S, F>(
    input_path: &Path,
    output_dir: &Path,
    variants: &[CompressVariant],
    options: &CompressOptions,
    progress_callback: S,
    completion_callback: F,
) -> Result<Vec<VariantOutcome>>
where
    S: FnMut(usize, &CompressVariant),
    F: FnMut(usize, &VariantOutcome),
{
    if !input_path.exists() {
        return Err(anyhow!("{} not found", input_path.display()));
    }

    Ok(compress_variants(
        input_path,
        output_dir,
        variants,
        options,
        progress_callback,
        completion_callback,
    ))
}
