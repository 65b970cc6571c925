use crate::cli::{AllArgs, Args, Command, CompressArgs, FaviconArgs, ResizeArgs};
use crate::image_processing::compress::CompressVariant;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON settings file
///
/// ```json
/// { "outputDir": "outputs", "quality": 85, "optimize": true, "faviconSize": 64,
///   "faviconOutput": "outputs/favicon.ico", "resizeSize": "500x500",
///   "resizeOutput": "outputs/logo_500.png",
///   "variants": [{ "name": "compressed", "maxWidth": 800 }] }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub output_dir: Option<String>,
    pub quality: Option<u8>,
    pub optimize: Option<bool>,
    pub favicon_size: Option<u32>,
    pub favicon_output: Option<String>,
    pub resize_size: Option<String>,
    pub resize_output: Option<String>,
    pub variants: Option<Vec<CompressVariant>>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ConfigFile::load(&config_path)?;
            self.command.merge_from_config(&config);

            if self.verbose && !self.json {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }
}

impl Command {
    pub fn merge_from_config(&mut self, config: &ConfigFile) {
        match self {
            Command::Favicon(args) => args.merge_from_config(config),
            Command::Compress(args) => args.merge_from_config(config),
            Command::Resize(args) => args.merge_from_config(config),
            Command::All(args) => args.merge_from_config(config),
        }
    }
}

impl FaviconArgs {
    fn merge_from_config(&mut self, config: &ConfigFile) {
        if self.output.is_none() {
            self.output = config.favicon_output.as_ref().map(PathBuf::from).or_else(|| {
                config
                    .output_dir
                    .as_ref()
                    .map(|dir| Path::new(dir).join(crate::cli::DEFAULT_FAVICON_NAME))
            });
        }

        if self.size.is_none() {
            self.size = config.favicon_size;
        }
    }
}

impl CompressArgs {
    fn merge_from_config(&mut self, config: &ConfigFile) {
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.as_ref().map(PathBuf::from);
        }

        if self.quality.is_none() {
            self.quality = config.quality;
        }

        // Explicit --max-width values replace the configured variants entirely
        if let Some(variants) = &config.variants {
            self.config_variants = variants.clone();
        }

        self.config_optimize = config.optimize;
    }
}

impl ResizeArgs {
    fn merge_from_config(&mut self, config: &ConfigFile) {
        if self.size.is_none() {
            self.size = config.resize_size.clone();
        }

        if self.output.is_none() {
            if let Some(output) = &config.resize_output {
                self.output = Some(PathBuf::from(output));
            } else if let Some(dir) = &config.output_dir {
                // Keep the default file name, just relocate it
                if let Ok((width, height)) = self.dimensions() {
                    self.output = Some(Path::new(dir).join(
                        crate::cli::default_resize_filename(&self.input, width, height),
                    ));
                }
            }
        }
    }
}

impl AllArgs {
    fn merge_from_config(&mut self, config: &ConfigFile) {
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.as_ref().map(PathBuf::from);
            self.config_favicon_output = config.favicon_output.as_ref().map(PathBuf::from);
            self.config_resize_output = config.resize_output.as_ref().map(PathBuf::from);
        }

        if self.favicon_size.is_none() {
            self.favicon_size = config.favicon_size;
        }

        if self.size.is_none() {
            self.size = config.resize_size.clone();
        }

        if self.quality.is_none() {
            self.quality = config.quality;
        }

        if let Some(variants) = &config.variants {
            self.config_variants = variants.clone();
        }

        self.config_optimize = config.optimize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config() -> ConfigFile {
        serde_json::from_str(
            r#"{
                "outputDir": "site/static",
                "quality": 70,
                "optimize": false,
                "faviconSize": 32,
                "resizeSize": "256x256",
                "variants": [
                    { "name": "hero", "maxWidth": 1200 },
                    { "name": "thumb", "maxWidth": 96 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ConfigFile = serde_json::from_str(r#"{ "quality": 90 }"#).unwrap();
        assert_eq!(config.quality, Some(90));
        assert!(config.output_dir.is_none());
        assert!(config.variants.is_none());
    }

    #[test]
    fn test_config_fills_unset_values() {
        let mut args = Args::parse_from(["logo-processor", "compress", "-i", "logo.png"]);
        args.command.merge_from_config(&config());

        let Command::Compress(compress) = &args.command else {
            panic!("expected compress");
        };
        assert_eq!(compress.output_dir(), PathBuf::from("site/static"));
        assert_eq!(compress.quality(), 70);
        assert!(!compress.optimize());
        assert_eq!(
            compress.variants(),
            vec![
                CompressVariant::new("hero", 1200),
                CompressVariant::new("thumb", 96)
            ]
        );
    }

    #[test]
    fn test_command_line_wins_over_config() {
        let mut args = Args::parse_from([
            "logo-processor",
            "compress",
            "-i",
            "logo.png",
            "-o",
            "out",
            "-q",
            "95",
            "--max-width",
            "300",
        ]);
        args.command.merge_from_config(&config());

        let Command::Compress(compress) = &args.command else {
            panic!("expected compress");
        };
        assert_eq!(compress.output_dir(), PathBuf::from("out"));
        assert_eq!(compress.quality(), 95);
        assert_eq!(compress.variants(), vec![CompressVariant::new("w300", 300)]);
    }

    #[test]
    fn test_config_relocates_favicon_and_resize() {
        let mut favicon = Args::parse_from(["logo-processor", "favicon", "-i", "logo.png"]);
        favicon.command.merge_from_config(&config());
        let Command::Favicon(f) = &favicon.command else {
            panic!("expected favicon");
        };
        assert_eq!(f.output_path(), PathBuf::from("site/static/favicon.ico"));
        assert_eq!(f.icon_size(), 32);

        let mut resize = Args::parse_from(["logo-processor", "resize", "-i", "logo.png"]);
        resize.command.merge_from_config(&config());
        let Command::Resize(r) = &resize.command else {
            panic!("expected resize");
        };
        assert_eq!(r.dimensions().unwrap(), (256, 256));
        assert_eq!(
            r.output_path().unwrap(),
            PathBuf::from("site/static/logo_256.png")
        );
    }

    #[test]
    fn test_load_and_merge_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.json");
        fs::write(&path, serde_json::to_string(&config()).unwrap()).unwrap();

        let mut args = Args::parse_from([
            "logo-processor",
            "--config",
            path.to_str().unwrap(),
            "all",
            "-i",
            "logo.png",
        ]);
        args.load_and_merge_config().unwrap();

        let Command::All(all) = &args.command else {
            panic!("expected all");
        };
        assert_eq!(all.output_dir(), PathBuf::from("site/static"));
        assert_eq!(all.favicon_args().icon_size(), 32);
        assert_eq!(all.compress_args().variants().len(), 2);
    }

    #[test]
    fn test_all_uses_configured_favicon_and_resize_paths() {
        let mut config = config();
        config.favicon_output = Some("site/icons/favicon.ico".to_string());
        config.resize_output = Some("site/img/logo_square.png".to_string());

        let mut args = Args::parse_from(["logo-processor", "all", "-i", "logo.png"]);
        args.command.merge_from_config(&config);
        let Command::All(all) = &args.command else {
            panic!("expected all");
        };
        assert_eq!(
            all.favicon_args().output_path(),
            PathBuf::from("site/icons/favicon.ico")
        );
        assert_eq!(
            all.resize_args().unwrap().output_path().unwrap(),
            PathBuf::from("site/img/logo_square.png")
        );
        assert_eq!(all.compress_args().output_dir(), PathBuf::from("site/static"));

        // An explicit output directory keeps every file inside it
        let mut args = Args::parse_from(["logo-processor", "all", "-i", "logo.png", "-o", "out"]);
        args.command.merge_from_config(&config);
        let Command::All(all) = &args.command else {
            panic!("expected all");
        };
        assert_eq!(all.favicon_args().output_path(), PathBuf::from("out/favicon.ico"));
        assert_eq!(
            all.resize_args().unwrap().output_path().unwrap(),
            PathBuf::from("out/logo_256.png")
        );
    }

    #[test]
    fn test_load_missing_config_is_error() {
        let mut args = Args::parse_from([
            "logo-processor",
            "--config",
            "/definitely/not/here.json",
            "favicon",
            "-i",
            "logo.png",
        ]);
        assert!(args.load_and_merge_config().is_err());
    }
}
