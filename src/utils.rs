use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::cli::{parse_size, Args, Command};
use crate::image_processing::compress::CompressVariant;
use crate::image_processing::favicon::MAX_FAVICON_SIZE;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(progress_style) = ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
///
/// Input existence is left to each command: compress reports a missing input
/// and exits cleanly, the other commands fail.
pub fn validate_inputs(args: &Args) -> Result<()> {
    match &args.command {
        Command::Favicon(favicon) => validate_favicon_size(favicon.icon_size())?,
        Command::Compress(compress) => {
            validate_quality(compress.quality())?;
            validate_variants(&compress.variants())?;
        }
        Command::Resize(resize) => {
            resize.dimensions().map_err(anyhow::Error::msg)?;
        }
        Command::All(all) => {
            validate_favicon_size(all.favicon_args().icon_size())?;
            let compress = all.compress_args();
            validate_quality(compress.quality())?;
            validate_variants(&compress.variants())?;
            if let Some(size) = &all.size {
                parse_size(size).map_err(anyhow::Error::msg)?;
            }
        }
    }

    Ok(())
}

fn validate_favicon_size(size: u32) -> Result<()> {
    if size == 0 || size > MAX_FAVICON_SIZE {
        return Err(anyhow::anyhow!(
            "Favicon size must be between 1 and {} pixels, got: {}",
            MAX_FAVICON_SIZE,
            size
        ));
    }
    Ok(())
}

fn validate_quality(quality: u8) -> Result<()> {
    if quality > 100 {
        return Err(anyhow::anyhow!(
            "Quality must be between 0 and 100, got: {}",
            quality
        ));
    }
    Ok(())
}

fn validate_variants(variants: &[CompressVariant]) -> Result<()> {
    for variant in variants {
        if variant.max_width == 0 {
            return Err(anyhow::anyhow!(
                "Variant '{}' must have a maximum width greater than 0",
                variant.name
            ));
        }
        if variant.name.is_empty() || sanitize_filename(&variant.name) != variant.name {
            return Err(anyhow::anyhow!(
                "Invalid variant name '{}'. Use letters, digits, '-' or '_'",
                variant.name
            ));
        }
    }

    for (i, variant) in variants.iter().enumerate() {
        if variants[..i].iter().any(|v| v.name == variant.name) {
            return Err(anyhow::anyhow!(
                "Variant name '{}' is used more than once",
                variant.name
            ));
        }
    }

    Ok(())
}

/// Generate a safe filename by removing/replacing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            // Replace problematic characters with underscores
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' | ' ' => '_',
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            // Replace non-ASCII with underscore
            _ => '_',
        })
        .collect()
}

/// Input path for display, falling back to the full path when it has no file name
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
