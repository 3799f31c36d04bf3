//! Configuration Module - optional TOML file passed with `--config`
//!
//! Supports:
//! - Default log level for the stderr logger
//! - Read-ahead buffer size used while walking files

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::check::CheckOptions;
use crate::cursor::DEFAULT_BUFFER_SIZE;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// image-check configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Check settings
    pub check: CheckConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Read-ahead buffer in bytes
    pub buffer_size: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl From<&CheckConfig> for CheckOptions {
    fn from(config: &CheckConfig) -> Self {
        CheckOptions {
            buffer_size: config.buffer_size,
        }
    }
}

impl Config {
    /// Load and validate config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.check.buffer_size == 0 {
            bail!("check.buffer_size must be greater than zero");
        }
        let level = self.general.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            bail!(
                "general.log_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.general.log_level
            );
        }
        Ok(())
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions::from(&self.check)
    }
}

/// Generate a sample config file with comments
pub fn generate_sample_config() -> String {
    r#"# image-check configuration
# Pass with: image-check --config image-check.toml <file>

[general]
# Log level: trace, debug, info, warn, error, off
# RUST_LOG overrides this when set.
log_level = "warn"

[check]
# Read-ahead buffer size in bytes
buffer_size = 8192
"#
    .to_string()
}
