//! Resizer configuration module.
//!
//! Handles loading, validating, and merging `resize.toml`. Stock defaults are
//! overridden by the user file, and command-line flags override both.
//!
//! ## Config File Location
//!
//! `resize.toml` is looked up in the directory passed with `--config-dir`
//! (the current directory by default). A missing file is not an error.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! suffix = "_resized"       # Inserted between stem and extension
//! quality = 90              # JPEG quality (1-100)
//!
//! [resize]
//! mode = "stretch"          # stretch | aspect-fit | crop-to-fill
//! brighten_factor = 1.2     # Factor applied by --brighten
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! timeout_secs = 30         # Per-image time limit (omit to disable)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, so override just the values you want:
//!
//! ```toml
//! [output]
//! suffix = "_small"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DEFAULT_BRIGHTEN_FACTOR, FitMode};
use crate::naming::suffix_has_separator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "resize.toml";

/// Suffix used when neither the file nor the CLI sets one.
pub const DEFAULT_SUFFIX: &str = "_resized";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `resize.toml`.
///
/// All fields have defaults. User files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Output naming and encoding.
    pub output: OutputConfig,
    /// Fit mode and brightness.
    pub resize: ResizeSection,
    /// Parallelism and per-item time limit.
    pub processing: ProcessingConfig,
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if suffix_has_separator(&self.output.suffix) {
            return Err(ConfigError::Validation(
                "output.suffix must not contain a path separator".into(),
            ));
        }
        let factor = self.resize.brighten_factor;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::Validation(
                "resize.brighten_factor must be a positive number".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.processing.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "processing.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub suffix: String,
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSection {
    /// Fit mode used when no `--keep-aspect`/`--crop` flag is given.
    pub mode: FitMode,
    /// Multiplier applied by `--brighten`.
    pub brighten_factor: f32,
}

impl Default for ResizeSection {
    fn default() -> Self {
        Self {
            mode: FitMode::Stretch,
            brighten_factor: DEFAULT_BRIGHTEN_FACTOR,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
    /// Per-image time limit in seconds. Absent means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Resolve the effective worker count.
///
/// `requested` (from `--jobs`) wins over the config file. Either way the
/// result is clamped to the available cores and never drops below 1.
pub fn effective_threads(config: &ProcessingConfig, requested: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested
        .or(config.max_processes)
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Stock defaults as a TOML value, the base layer every merge starts from.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ResizeConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Deep-merge `overlay` onto `base`. Tables merge key by key; any other
/// value in `overlay` replaces the one in `base`.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `resize.toml` from `dir` without deserializing it. `None` when absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge `overlay` over `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for `dir`: stock defaults plus `resize.toml`.
pub fn load_config(dir: &Path) -> Result<ResizeConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(dir)?)
}

/// A fully commented `resize.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# batch-resize configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as resize.toml in the directory passed with --config-dir
# (the current directory by default). Command-line flags override it.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output files
# ---------------------------------------------------------------------------
[output]
# Inserted between the file stem and its extension: photo.jpg -> photo_resized.jpg
# Must not contain a path separator.
suffix = "_resized"

# JPEG encoding quality (1 = worst, 100 = best). Other formats ignore it.
quality = 90

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# How the source is fitted into WIDTHxHEIGHT when no flag picks a mode:
#   stretch      - resize to exactly WIDTHxHEIGHT, distorting if needed
#   aspect-fit   - largest box inside WIDTHxHEIGHT with the source ratio
#   crop-to-fill - cover WIDTHxHEIGHT, then crop the center to exactly that size
mode = "stretch"

# Brightness multiplier used by --brighten. Must be greater than 0.
brighten_factor = 1.2

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers. 1 processes files in order.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# Give up on a single image once it has taken longer than this many seconds.
# Omit to disable.
# timeout_secs = 30
"##
}
