use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::image_processing::compress::{default_variants, CompressVariant, DEFAULT_QUALITY};
use crate::image_processing::favicon::DEFAULT_FAVICON_SIZE;

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_FAVICON_NAME: &str = "favicon.ico";
pub const DEFAULT_RESIZE: &str = "500x500";

#[derive(Parser, Debug)]
#[command(
    name = "logo-processor",
    about = "Turn a PNG logo into a favicon, web-optimized variants and fixed-size renditions",
    long_about = "
Logo Processor

Takes a single PNG logo and produces the assets a website usually needs:
an ICO favicon, width-capped compressed PNG variants and a fixed-size square
rendition. Transparency is preserved everywhere and all resampling uses a
Lanczos3 filter.

Example Usage:
  # 64x64 favicon written to outputs/favicon.ico
  logo-processor favicon -i ~/assets/logo.png

  # Default compressed variants (800, 400 and 128 pixels wide)
  logo-processor compress -i ~/assets/logo.png

  # Custom width caps with a summary table
  logo-processor --report compress -i ~/assets/logo.png --max-width 1024 --max-width 256

  # Fixed 500x500 rendition
  logo-processor resize -i ~/assets/logo.png

  # Everything at once, machine-readable output
  logo-processor --json all -i ~/assets/logo.png -o ~/site/static

  # Settings from a JSON file (command-line values win)
  logo-processor --config logo.json all -i ~/assets/logo.png"
)]
pub struct Args {
    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Emit JSON lines on stdout instead of styled text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Display a table summarizing every compressed variant
    #[arg(long = "report", global = true)]
    pub report: bool,

    /// JSON configuration file; command-line values take precedence
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert a PNG into an RGBA ICO favicon
    Favicon(FaviconArgs),
    /// Write width-capped, optimized PNG variants
    Compress(CompressArgs),
    /// Resize a PNG to a fixed size (aspect ratio is not preserved)
    Resize(ResizeArgs),
    /// Run favicon, compress and resize against the same input
    All(AllArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FaviconArgs {
    /// Input PNG file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output ICO file [default: outputs/favicon.ico]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Icon edge length in pixels (1-256) [default: 64]
    #[arg(long = "size", value_name = "PIXELS")]
    pub size: Option<u32>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompressArgs {
    /// Input PNG file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output directory for the variants [default: outputs]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Quality for lossy encoders (0-100); PNG output ignores it [default: 85]
    #[arg(short = 'q', long = "quality", value_name = "QUALITY")]
    pub quality: Option<u8>,

    /// Maximum width of a variant; repeat for several variants
    /// [default: 800 (compressed), 400 (small), 128 (tiny)]
    #[arg(long = "max-width", value_name = "PIXELS")]
    pub max_widths: Vec<u32>,

    /// Skip the lossless oxipng pass
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Variants loaded from a configuration file
    #[arg(skip)]
    pub config_variants: Vec<CompressVariant>,

    #[arg(skip)]
    pub config_optimize: Option<bool>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResizeArgs {
    /// Input PNG file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output PNG file [default: outputs/<name>_<width>.png]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Target size (format: WIDTHxHEIGHT) [default: 500x500]
    #[arg(short = 's', long = "size", value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AllArgs {
    /// Input PNG file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output directory for every generated file [default: outputs]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Favicon edge length in pixels [default: 64]
    #[arg(long = "favicon-size", value_name = "PIXELS")]
    pub favicon_size: Option<u32>,

    /// Fixed resize target (format: WIDTHxHEIGHT) [default: 500x500]
    #[arg(short = 's', long = "size", value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Quality for lossy encoders (0-100); PNG output ignores it [default: 85]
    #[arg(short = 'q', long = "quality", value_name = "QUALITY")]
    pub quality: Option<u8>,

    /// Maximum width of a compressed variant; repeat for several variants
    #[arg(long = "max-width", value_name = "PIXELS")]
    pub max_widths: Vec<u32>,

    /// Skip the lossless oxipng pass
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    #[arg(skip)]
    pub config_variants: Vec<CompressVariant>,

    #[arg(skip)]
    pub config_optimize: Option<bool>,

    /// Favicon and resize paths from a configuration file; `-o` overrides both
    #[arg(skip)]
    pub config_favicon_output: Option<PathBuf>,

    #[arg(skip)]
    pub config_resize_output: Option<PathBuf>,
}

/// Parse a `WIDTHxHEIGHT` string into width and height
pub fn parse_size(size: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = size.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid size format '{}'. Use WIDTHxHEIGHT (e.g., 500x500)",
            size
        ));
    }

    let width = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid width: '{}'", parts[0]))?;
    let height = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid height: '{}'", parts[1]))?;

    if width == 0 || height == 0 {
        return Err("Width and height must be greater than 0".to_string());
    }

    if width > 4000 || height > 4000 {
        return Err("Width and height must be less than 4000 pixels".to_string());
    }

    Ok((width, height))
}

/// Variants to generate: explicit widths win, then configured variants, then the defaults
pub fn resolve_variants(
    max_widths: &[u32],
    config_variants: &[CompressVariant],
) -> Vec<CompressVariant> {
    if !max_widths.is_empty() {
        let mut variants: Vec<CompressVariant> = Vec::new();
        for &width in max_widths {
            // Remove duplicates while preserving order
            if !variants.iter().any(|v| v.max_width == width) {
                variants.push(CompressVariant::new(format!("w{}", width), width));
            }
        }
        return variants;
    }

    if !config_variants.is_empty() {
        return config_variants.to_vec();
    }

    default_variants()
}

/// Default name of the fixed-size rendition, e.g. `logo_500.png` or `logo_640x480.png`
pub fn default_resize_filename(input: &Path, width: u32, height: u32) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    if width == height {
        format!("{}_{}.png", stem, width)
    } else {
        format!("{}_{}x{}.png", stem, width, height)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl FaviconArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_dir().join(DEFAULT_FAVICON_NAME))
    }

    pub fn icon_size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_FAVICON_SIZE)
    }
}

impl CompressArgs {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    pub fn quality(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }

    pub fn optimize(&self) -> bool {
        !self.no_optimize && self.config_optimize.unwrap_or(true)
    }

    pub fn variants(&self) -> Vec<CompressVariant> {
        resolve_variants(&self.max_widths, &self.config_variants)
    }
}

impl ResizeArgs {
    pub fn dimensions(&self) -> Result<(u32, u32), String> {
        parse_size(self.size.as_deref().unwrap_or(DEFAULT_RESIZE))
    }

    pub fn output_path(&self) -> Result<PathBuf, String> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        let (width, height) = self.dimensions()?;
        Ok(default_output_dir().join(default_resize_filename(&self.input, width, height)))
    }
}

impl AllArgs {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    /// Favicon step, written into the shared output directory unless configured otherwise
    pub fn favicon_args(&self) -> FaviconArgs {
        FaviconArgs {
            input: self.input.clone(),
            output: Some(
                self.config_favicon_output
                    .clone()
                    .unwrap_or_else(|| self.output_dir().join(DEFAULT_FAVICON_NAME)),
            ),
            size: self.favicon_size,
        }
    }

    pub fn compress_args(&self) -> CompressArgs {
        CompressArgs {
            input: self.input.clone(),
            output_dir: Some(self.output_dir()),
            quality: self.quality,
            max_widths: self.max_widths.clone(),
            no_optimize: self.no_optimize,
            config_variants: self.config_variants.clone(),
            config_optimize: self.config_optimize,
        }
    }

    pub fn resize_args(&self) -> Result<ResizeArgs, String> {
        let size = self.size.clone().unwrap_or_else(|| DEFAULT_RESIZE.to_string());
        let (width, height) = parse_size(&size)?;
        Ok(ResizeArgs {
            input: self.input.clone(),
            output: Some(self.config_resize_output.clone().unwrap_or_else(|| {
                self.output_dir()
                    .join(default_resize_filename(&self.input, width, height))
            })),
            size: Some(size),
        })
    }
}

impl Command {
    /// Input file shared by every subcommand
    pub fn input(&self) -> &Path {
        match self {
            Command::Favicon(a) => &a.input,
            Command::Compress(a) => &a.input,
            Command::Resize(a) => &a.input,
            Command::All(a) => &a.input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("500x500").unwrap(), (500, 500));
        assert_eq!(parse_size("1920x1080").unwrap(), (1920, 1080));
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("invalid").is_err());
        assert!(parse_size("500").is_err());
        assert!(parse_size("0x500").is_err());
        assert!(parse_size("500x4001").is_err());
        assert!(parse_size("1x2x3").is_err());
    }

    #[test]
    fn test_resolve_variants() {
        assert_eq!(resolve_variants(&[], &[]), default_variants());

        let configured = vec![CompressVariant::new("hero", 1200)];
        assert_eq!(resolve_variants(&[], &configured), configured);

        let explicit = resolve_variants(&[640, 320, 640], &configured);
        assert_eq!(
            explicit,
            vec![
                CompressVariant::new("w640", 640),
                CompressVariant::new("w320", 320)
            ]
        );
    }

    #[test]
    fn test_default_resize_filename() {
        let input = Path::new("/assets/quickerqr_logo_raw.png");
        assert_eq!(
            default_resize_filename(input, 500, 500),
            "quickerqr_logo_raw_500.png"
        );
        assert_eq!(
            default_resize_filename(input, 640, 480),
            "quickerqr_logo_raw_640x480.png"
        );
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from(["logo-processor", "favicon", "-i", "logo.png"]).unwrap();
        match &args.command {
            Command::Favicon(f) => {
                assert_eq!(f.output_path(), PathBuf::from("outputs/favicon.ico"));
                assert_eq!(f.icon_size(), 64);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args = Args::try_parse_from([
            "logo-processor",
            "compress",
            "-i",
            "logo.png",
            "--max-width",
            "300",
            "--max-width",
            "100",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        match &args.command {
            Command::Compress(c) => {
                assert_eq!(c.max_widths, vec![300, 100]);
                assert_eq!(c.quality(), 85);
                assert!(c.optimize());
                assert_eq!(c.output_dir(), PathBuf::from("outputs"));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args =
            Args::try_parse_from(["logo-processor", "resize", "-i", "/a/logo.png"]).unwrap();
        match &args.command {
            Command::Resize(r) => {
                assert_eq!(r.dimensions().unwrap(), (500, 500));
                assert_eq!(
                    r.output_path().unwrap(),
                    PathBuf::from("outputs/logo_500.png")
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["logo-processor", "favicon"]).is_err());
    }

    #[test]
    fn test_all_args_split_into_steps() {
        let args = Args::try_parse_from([
            "logo-processor",
            "all",
            "-i",
            "logo.png",
            "-o",
            "site",
            "-s",
            "256x128",
            "--no-optimize",
        ])
        .unwrap();
        let Command::All(all) = args.command else {
            panic!("expected all");
        };

        assert_eq!(
            all.favicon_args().output_path(),
            PathBuf::from("site/favicon.ico")
        );
        assert!(!all.compress_args().optimize());
        assert_eq!(all.compress_args().output_dir(), PathBuf::from("site"));

        let resize = all.resize_args().unwrap();
        assert_eq!(resize.dimensions().unwrap(), (256, 128));
        assert_eq!(
            resize.output_path().unwrap(),
            PathBuf::from("site/logo_256x128.png")
        );
    }
}
