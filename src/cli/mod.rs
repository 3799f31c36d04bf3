//! CLI module - Command line interface definitions

use std::path::PathBuf;

use clap::Parser;

/// image-check - verify that an image file is structurally complete
///
/// Walks PNG, JPEG, GIF and SWF files to their terminator without decoding
/// content. Prints nothing and exits 0 when the file is complete.
#[derive(Parser, Debug)]
#[command(name = "image-check")]
#[command(version)]
#[command(about = "Check that an image file is not truncated", long_about = None)]
pub struct Cli {
    /// File to check
    pub path: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(long, short)]
    pub verbose: bool,

    /// Load settings from a TOML config file
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Log directive for the `image_check` target.
    pub fn log_directive(&self, configured_level: &str) -> String {
        let level = if self.verbose {
            "debug".to_string()
        } else {
            configured_level.to_ascii_lowercase()
        };
        format!("image_check={}", level)
    }
}
