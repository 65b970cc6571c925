use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::cell::Cell;
use std::path::Path;
use std::time::Instant;

use logo_processor::cli::{Args, Command, CompressArgs, FaviconArgs, ResizeArgs};
use logo_processor::image_processing::compress::{
    compress_file, format_kb, CompressOptions, VariantOutcome,
};
use logo_processor::image_processing::favicon::convert_to_favicon;
use logo_processor::image_processing::report::{format_ratio, CompressionEntry, CompressionSummary};
use logo_processor::image_processing::resize::resize_to_fixed;
use logo_processor::json_output::JsonMessage;
use logo_processor::utils::{
    create_progress_bar, display_name, error_println, format_duration, validate_inputs,
    verbose_println, warn_println,
};

/// Output settings shared by every command
struct Ui {
    verbose: bool,
    json: bool,
    report: bool,
}

impl Ui {
    fn verbose(&self, message: &str) {
        if !self.json {
            verbose_println(self.verbose, message);
        }
    }
}

/// Outputs written and failed across the whole run
#[derive(Default)]
struct Tally {
    processed: usize,
    failed: usize,
}

impl Tally {
    fn add(&mut self, other: Tally) {
        self.processed += other.processed;
        self.failed += other.failed;
    }
}

fn run_favicon(args: &FaviconArgs, ui: &Ui) -> Result<Tally> {
    let output_path = args.output_path();
    let started = Instant::now();

    if ui.json {
        JsonMessage::started("favicon", &args.input);
    } else {
        println!("{}", style("Converting PNG to favicon...").bold());
    }
    ui.verbose(&format!(
        "Favicon: {} -> {} ({}x{})",
        args.input.display(),
        output_path.display(),
        args.icon_size(),
        args.icon_size()
    ));

    let result = match convert_to_favicon(&args.input, &output_path, args.icon_size()) {
        Ok(result) => result,
        Err(e) => {
            if ui.json {
                JsonMessage::file_failed("favicon", &args.input, None, format!("{:#}", e));
            }
            return Err(e);
        }
    };

    if ui.json {
        JsonMessage::file_completed(
            "favicon",
            &args.input,
            &result.output_path,
            (result.size, result.size),
            result.output_size,
            started.elapsed().as_millis(),
        );
    } else {
        ui.verbose(&format!(
            "Source mode {} converted to RGBA",
            result.original_mode.name()
        ));
        println!(
            "  {} {} ({}x{})",
            style("✓ Saved as:").green(),
            style(result.output_path.display()).bold(),
            result.size,
            result.size
        );
    }

    Ok(Tally {
        processed: 1,
        failed: 0,
    })
}

fn run_resize(args: &ResizeArgs, ui: &Ui) -> Result<Tally> {
    let (width, height) = args.dimensions().map_err(anyhow::Error::msg)?;
    let output_path = args.output_path().map_err(anyhow::Error::msg)?;
    let started = Instant::now();

    if ui.json {
        JsonMessage::started("resize", &args.input);
    } else {
        println!(
            "{}",
            style(format!("Resizing to {}x{}...", width, height)).bold()
        );
    }

    let result = match resize_to_fixed(&args.input, &output_path, width, height) {
        Ok(result) => result,
        Err(e) => {
            if ui.json {
                JsonMessage::file_failed("resize", &args.input, None, format!("{:#}", e));
            }
            return Err(e);
        }
    };

    if ui.json {
        JsonMessage::file_completed(
            "resize",
            &args.input,
            &result.output_path,
            (result.width, result.height),
            result.output_size,
            started.elapsed().as_millis(),
        );
    } else {
        ui.verbose(&format!(
            "Resized {}x{} ({}) to {}x{}",
            result.original_dimensions.0,
            result.original_dimensions.1,
            result.mode.name(),
            result.width,
            result.height
        ));
        println!(
            "  {} {}",
            style("✓ Saved as:").green(),
            style(result.output_path.display()).bold()
        );
        println!("{}", style("Done.").green());
    }

    Ok(Tally {
        processed: 1,
        failed: 0,
    })
}

/// Human-readable diagnostics for one finished variant
fn print_variant_outcome(outcome: &VariantOutcome) {
    match &outcome.result {
        Ok(report) => {
            let (w, h) = report.original_dimensions;
            println!("Original image size: {}x{}", w, h);
            println!("Original file size: {}", format_kb(report.original_size));
            if report.has_transparency() {
                println!("Image has transparency - keeping as PNG");
            }
            if report.resized {
                let (w, h) = report.final_dimensions;
                println!("Resized to: {}x{}", w, h);
            }
            println!(
                "Compressed file size: {}",
                style(format_kb(report.compressed_size)).bold()
            );
            println!(
                "Compression ratio: {}",
                style(format_ratio(report.compression_ratio())).bold().green()
            );
            println!("Saved as: {}", style(report.output_path.display()).cyan());
        }
        Err(e) => {
            println!(
                "{} {:#}",
                style("Error processing image:").red().bold(),
                e
            );
        }
    }
}

fn run_compress(args: &CompressArgs, ui: &Ui) -> Result<Tally> {
    let input = &args.input;
    let output_dir = args.output_dir();
    let variants = args.variants();
    let options = CompressOptions {
        quality: args.quality(),
        optimize: args.optimize(),
        ..Default::default()
    };

    let pb = if ui.json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(variants.len() as u64)
    };
    let variant_started = Cell::new(Instant::now());

    let result = compress_file(
        input,
        &output_dir,
        &variants,
        &options,
        |index, variant| {
            variant_started.set(Instant::now());
            pb.set_message(format!("{} ({}px)", variant.name, variant.max_width));
            if index == 0 {
                if ui.json {
                    JsonMessage::started("compress", input);
                    return;
                }
                pb.suspend(|| {
                    println!("{}", style("Compressing PNG logo for web use...").bold());
                    println!("{}", "=".repeat(40));
                    verbose_println(
                        ui.verbose,
                        &format!(
                            "Variants: {}",
                            variants
                                .iter()
                                .map(|v| format!("{} ({}px)", v.name, v.max_width))
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    );
                    verbose_println(
                        ui.verbose,
                        &format!(
                            "Quality: {} (unused for PNG), optimize: {}",
                            options.quality, options.optimize
                        ),
                    );
                });
            } else if !ui.json {
                pb.suspend(|| {
                    println!();
                    println!("{}", "=".repeat(40));
                    println!(
                        "{}",
                        style(format!(
                            "Creating {} version (max width {})...",
                            variant.name, variant.max_width
                        ))
                        .bold()
                    );
                });
            }
        },
        |_, outcome| {
            let elapsed = variant_started.get().elapsed();
            if ui.json {
                match &outcome.result {
                    Ok(report) => JsonMessage::from_compression(
                        &outcome.variant.name,
                        report,
                        elapsed.as_millis(),
                    )
                    .emit(),
                    Err(e) => JsonMessage::file_failed(
                        "compress",
                        input,
                        Some(&outcome.variant.name),
                        format!("{:#}", e),
                    ),
                }
            } else {
                pb.suspend(|| {
                    print_variant_outcome(outcome);
                    verbose_println(
                        ui.verbose,
                        &format!("Variant took {}", format_duration(elapsed)),
                    );
                });
            }
            pb.inc(1);
        },
    );

    let outcomes = match result {
        Ok(outcomes) => outcomes,
        Err(e) => {
            // Missing input: nothing was written and the run ends cleanly
            pb.finish_and_clear();
            if ui.json {
                JsonMessage::file_failed("compress", input, None, e.to_string());
            } else {
                error_println(&e.to_string());
            }
            return Ok(Tally {
                processed: 0,
                failed: 1,
            });
        }
    };
    pb.finish_and_clear();

    let mut summary = CompressionSummary::new(input);
    for outcome in &outcomes {
        summary.add(CompressionEntry::from_outcome(outcome));
    }

    if ui.report && !ui.json {
        summary.print();
    }

    Ok(Tally {
        processed: summary.successful(),
        failed: summary.failed(),
    })
}

fn print_banner() {
    println!("{}", style("Logo Processor").bold().blue());
    println!("{}", style("Favicon, compression and resize for PNG logos").dim());
    println!();
}

fn warn_if_not_png(input: &Path, ui: &Ui) {
    let is_png = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if !is_png && !ui.json {
        warn_println(&format!(
            "{} does not have a .png extension; decoding by content",
            display_name(input)
        ));
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();

    args.load_and_merge_config()
        .context("Failed to load configuration")?;
    validate_inputs(&args)?;

    let ui = Ui {
        verbose: args.verbose,
        json: args.json,
        report: args.report,
    };

    if !ui.json {
        print_banner();
    }
    warn_if_not_png(args.command.input(), &ui);

    let tally = match &args.command {
        Command::Favicon(favicon) => run_favicon(favicon, &ui)?,
        Command::Compress(compress) => run_compress(compress, &ui)?,
        Command::Resize(resize) => run_resize(resize, &ui)?,
        Command::All(all) => {
            let mut tally = run_favicon(&all.favicon_args(), &ui)?;
            if !ui.json {
                println!();
            }
            tally.add(run_compress(&all.compress_args(), &ui)?);
            if !ui.json {
                println!();
            }
            let resize = all.resize_args().map_err(anyhow::Error::msg)?;
            tally.add(run_resize(&resize, &ui)?);
            tally
        }
    };

    let total_time = start_time.elapsed();
    if ui.json {
        JsonMessage::summary(
            tally.processed + tally.failed,
            tally.processed,
            tally.failed,
            total_time.as_secs_f64(),
        );
        return Ok(());
    }

    println!();
    println!("{}", style("Results Summary:").bold().green());
    println!(
        "  Files written: {}",
        style(tally.processed).bold().green()
    );
    if tally.failed > 0 {
        println!("  Failed: {}", style(tally.failed).bold().red());
    }
    println!(
        "  Total processing time: {}",
        style(format_duration(total_time)).bold()
    );

    Ok(())
}
