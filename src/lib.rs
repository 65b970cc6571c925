// Library exports for reuse by the binary and other applications
pub mod cli;
pub mod config_file;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, Command};
pub use config_file::ConfigFile;
pub use image_processing::compress::{
    compress_file, compress_png, compress_variants, CompressOptions, CompressVariant,
    CompressionReport,
};
pub use image_processing::favicon::{convert_to_favicon, FaviconResult};
pub use image_processing::resize::{resize_to_fixed, ResizeResult};
pub use image_processing::{ColorMode, ImageInfo};
pub use json_output::JsonMessage;
