//! Summary table for the compress command
//!
//! Collects one entry per variant, successful or not, and renders them as a
//! box-drawn table followed by a short summary.

use prettytable::{format, Cell, Row, Table};
use std::path::Path;

use super::compress::{format_kb, VariantOutcome};

/// Single variant entry for the report
#[derive(Debug, Clone)]
pub struct CompressionEntry {
    pub variant: String,
    pub max_width: u32,
    pub output_filename: String,
    pub original_dimensions: Option<(u32, u32)>,
    pub final_dimensions: Option<(u32, u32)>,
    pub original_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub ratio: Option<f64>,
    pub transparent: bool,
    pub error: Option<String>,
}

impl CompressionEntry {
    pub fn from_outcome(outcome: &VariantOutcome) -> Self {
        match &outcome.result {
            Ok(report) => Self {
                variant: outcome.variant.name.clone(),
                max_width: outcome.variant.max_width,
                output_filename: extract_filename(&report.output_path),
                original_dimensions: Some(report.original_dimensions),
                final_dimensions: Some(report.final_dimensions),
                original_size: Some(report.original_size),
                compressed_size: Some(report.compressed_size),
                ratio: report.compression_ratio(),
                transparent: report.has_transparency(),
                error: None,
            },
            Err(e) => Self {
                variant: outcome.variant.name.clone(),
                max_width: outcome.variant.max_width,
                output_filename: String::new(),
                original_dimensions: None,
                final_dimensions: None,
                original_size: None,
                compressed_size: None,
                ratio: None,
                transparent: false,
                error: Some(format!("{:#}", e)),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Complete compression report
#[derive(Debug, Default)]
pub struct CompressionSummary {
    pub input_filename: String,
    pub entries: Vec<CompressionEntry>,
}

impl CompressionSummary {
    pub fn new(input_path: &Path) -> Self {
        Self {
            input_filename: extract_filename(input_path),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: CompressionEntry) {
        self.entries.push(entry);
    }

    pub fn successful(&self) -> usize {
        self.entries.iter().filter(|e| e.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.successful()
    }

    /// Bytes written across all successful variants
    pub fn total_compressed(&self) -> u64 {
        self.entries.iter().filter_map(|e| e.compressed_size).sum()
    }

    /// Build the formatted table
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.add_row(Row::new(vec![
            Cell::new("Variant"),
            Cell::new("Max W"),
            Cell::new("Output"),
            Cell::new("Original"),
            Cell::new("Final"),
            Cell::new("Orig. size"),
            Cell::new("Size"),
            Cell::new("Ratio"),
            Cell::new("Alpha"),
        ]));

        for entry in &self.entries {
            self.add_entry_row(&mut table, entry);
        }

        table
    }

    /// Print the complete report
    pub fn print(&self) {
        println!();
        println!(
            "📊 COMPRESSION REPORT: {} ({} variants)\n",
            self.input_filename,
            self.entries.len()
        );

        self.table().printstd();
        println!();

        println!("   • Successful variants: {}", self.successful());
        if self.failed() > 0 {
            println!("   • Failed variants: {}", self.failed());
        }
        println!(
            "   • Total output size: {}",
            format_kb(self.total_compressed())
        );
        println!();
    }

    fn add_entry_row(&self, table: &mut Table, entry: &CompressionEntry) {
        if let Some(error) = &entry.error {
            table.add_row(Row::new(vec![
                Cell::new(&truncate(&entry.variant, 15)),
                Cell::new(&entry.max_width.to_string()),
                Cell::new(&format!("✗ {}", truncate(error, 40))),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
            ]));
            return;
        }

        table.add_row(Row::new(vec![
            Cell::new(&truncate(&entry.variant, 15)),
            Cell::new(&entry.max_width.to_string()),
            Cell::new(&truncate(&entry.output_filename, 30)),
            Cell::new(&format_dimensions(entry.original_dimensions)),
            Cell::new(&format_dimensions(entry.final_dimensions)),
            Cell::new(&entry.original_size.map(format_kb).unwrap_or_default()),
            Cell::new(&entry.compressed_size.map(format_kb).unwrap_or_default()),
            Cell::new(&format_ratio(entry.ratio)),
            Cell::new(if entry.transparent { "✓" } else { "✗" }),
        ]));
    }
}

fn format_dimensions(dimensions: Option<(u32, u32)>) -> String {
    dimensions
        .map(|(w, h)| format!("{}x{}", w, h))
        .unwrap_or_default()
}

/// Ratio with one decimal, or `n/a` when it is undefined
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r),
        None => "n/a".to_string(),
    }
}

/// Truncate string to fit in column
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

/// Helper to extract filename from path
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("unknown")
        .to_string()
}
