//! JSON output for scripting
//!
//! When --json flag is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::image_processing::compress::CompressionReport;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// A command started working on an input
    Started { command: String, input_path: String },
    /// Output file written
    FileCompleted {
        command: String,
        input_path: String,
        output_path: String,
        width: u32,
        height: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        original_size: Option<u64>,
        output_size: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        compression_ratio: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
        processing_time_ms: u128,
    },
    /// Output could not be produced
    FileFailed {
        command: String,
        input_path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
        error: String,
    },
    /// Processing summary
    Summary {
        total_files: usize,
        processed: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn started(command: &str, input_path: &Path) {
        Self::Started {
            command: command.to_string(),
            input_path: input_path.display().to_string(),
        }
        .emit();
    }

    /// Build the completion message for one compressed variant
    pub fn from_compression(
        variant: &str,
        report: &CompressionReport,
        processing_time_ms: u128,
    ) -> Self {
        Self::FileCompleted {
            command: "compress".to_string(),
            input_path: report.input_path.display().to_string(),
            output_path: report.output_path.display().to_string(),
            width: report.final_dimensions.0,
            height: report.final_dimensions.1,
            original_size: Some(report.original_size),
            output_size: report.compressed_size,
            compression_ratio: report.compression_ratio(),
            variant: Some(variant.to_string()),
            processing_time_ms,
        }
    }

    /// Create and emit file completed message for single-output commands
    pub fn file_completed(
        command: &str,
        input_path: &Path,
        output_path: &Path,
        (width, height): (u32, u32),
        output_size: u64,
        processing_time_ms: u128,
    ) {
        Self::FileCompleted {
            command: command.to_string(),
            input_path: input_path.display().to_string(),
            output_path: output_path.display().to_string(),
            width,
            height,
            original_size: None,
            output_size,
            compression_ratio: None,
            variant: None,
            processing_time_ms,
        }
        .emit();
    }

    /// Create and emit file failed message
    pub fn file_failed(
        command: &str,
        input_path: &Path,
        variant: Option<&str>,
        error: impl Into<String>,
    ) {
        Self::FileFailed {
            command: command.to_string(),
            input_path: input_path.display().to_string(),
            variant: variant.map(str::to_string),
            error: error.into(),
        }
        .emit();
    }

    /// Create and emit summary message
    pub fn summary(total_files: usize, processed: usize, failed: usize, duration_secs: f64) {
        Self::Summary {
            total_files,
            processed,
            failed,
            duration_secs,
        }
        .emit();
    }
}
