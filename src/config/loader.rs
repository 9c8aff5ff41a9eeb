//! Configuration file loading with precedence handling.

use crate::driver::DriverConfig;
use crate::state::{EngineConfig, PaginationConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "LOGWINDOW_CONFIG";
/// Env var overriding `batch_size`.
pub const BATCH_SIZE_ENV: &str = "LOGWINDOW_BATCH_SIZE";
/// Env var overriding `load_threshold`.
pub const LOAD_THRESHOLD_ENV: &str = "LOGWINDOW_LOAD_THRESHOLD";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override is not a valid number.
    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A resolved value is out of range.
    #[error("Invalid {key}: {reason}")]
    InvalidValue {
        /// Config key.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/logwindow/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Rows from an edge that trigger a fetch.
    #[serde(default)]
    pub load_threshold: Option<usize>,

    /// Rows per fetch.
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Rows rendered beyond each visible edge.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Tail poll period in milliseconds.
    #[serde(default)]
    pub tail_interval_ms: Option<u64>,

    /// Resize debounce window in milliseconds.
    #[serde(default)]
    pub resize_debounce_ms: Option<u64>,

    /// Simulated latency of the synthetic source in milliseconds.
    #[serde(default)]
    pub response_time_ms: Option<u64>,

    /// Fetch timeout in milliseconds; 0 disables it.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Rows generated before the first render.
    #[serde(default)]
    pub initial_rows: Option<usize>,

    /// Calibration samples per epoch.
    #[serde(default)]
    pub calibration_samples: Option<usize>,

    /// Keep the previous stop row in view after an edge append.
    #[serde(default)]
    pub reanchor_newer: Option<bool>,

    /// Reserve placeholder rows while older rows load.
    #[serde(default)]
    pub reserve_placeholders: Option<bool>,

    /// Font handed to the measurer.
    #[serde(default)]
    pub font: Option<String>,

    /// Show stats panel on startup.
    #[serde(default)]
    pub show_stats: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Rows from an edge that trigger a fetch.
    pub load_threshold: usize,
    /// Rows per fetch.
    pub batch_size: usize,
    /// Rows rendered beyond each visible edge.
    pub overscan: usize,
    /// Tail poll period in milliseconds.
    pub tail_interval_ms: u64,
    /// Resize debounce window in milliseconds.
    pub resize_debounce_ms: u64,
    /// Simulated source latency in milliseconds.
    pub response_time_ms: u64,
    /// Fetch timeout in milliseconds; 0 disables it.
    pub fetch_timeout_ms: u64,
    /// Rows generated before the first render.
    pub initial_rows: usize,
    /// Calibration samples per epoch.
    pub calibration_samples: usize,
    /// Re-anchor after edge appends.
    pub reanchor_newer: bool,
    /// Reserve placeholders during older fetches.
    pub reserve_placeholders: bool,
    /// Measurer font.
    pub font: String,
    /// Show stats on startup.
    pub show_stats: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            load_threshold: 200,
            batch_size: 300,
            overscan: 5,
            tail_interval_ms: 2000,
            resize_debounce_ms: 100,
            response_time_ms: 500,
            fetch_timeout_ms: 0,
            initial_rows: 500,
            calibration_samples: 20,
            reanchor_newer: true,
            reserve_placeholders: false,
            font: "13px monospace".to_string(),
            show_stats: true,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Check values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// `InvalidValue` naming the first offending key.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let zero = |key| ConfigError::InvalidValue {
            key,
            reason: "must be greater than zero",
        };
        if self.batch_size == 0 {
            return Err(zero("batch_size"));
        }
        if self.calibration_samples == 0 {
            return Err(zero("calibration_samples"));
        }
        if self.tail_interval_ms == 0 {
            return Err(zero("tail_interval_ms"));
        }
        Ok(self)
    }

    /// Pagination tunables.
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            load_threshold: self.load_threshold,
            batch_size: self.batch_size,
            tail_interval: Duration::from_millis(self.tail_interval_ms),
            reanchor_newer: self.reanchor_newer,
            reserve_placeholders: self.reserve_placeholders,
        }
    }

    /// Engine tunables.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            pagination: self.pagination(),
            overscan: self.overscan,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            font: self.font.clone(),
            calibration_samples: self.calibration_samples,
        }
    }

    /// Driver tunables.
    pub fn driver(&self) -> DriverConfig {
        DriverConfig {
            fetch_timeout: (self.fetch_timeout_ms > 0)
                .then(|| Duration::from_millis(self.fetch_timeout_ms)),
        }
    }

    /// Latency of the synthetic source.
    pub fn response_time(&self) -> Duration {
        Duration::from_millis(self.response_time_ms)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/logwindow/logwindow.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("logwindow").join("logwindow.log")
    } else {
        PathBuf::from("logwindow.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/logwindow/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logwindow").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LOGWINDOW_CONFIG` environment variable
/// 3. Default path `~/.config/logwindow/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

fn env_usize(name: &'static str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `LOGWINDOW_BATCH_SIZE` and `LOGWINDOW_LOAD_THRESHOLD`.
///
/// # Errors
///
/// `InvalidEnv` if a set variable is not a non-negative integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(batch_size) = env_usize(BATCH_SIZE_ENV)? {
        config.batch_size = batch_size;
    }
    if let Some(threshold) = env_usize(LOAD_THRESHOLD_ENV)? {
        config.load_threshold = threshold;
    }
    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        load_threshold: config.load_threshold.unwrap_or(defaults.load_threshold),
        batch_size: config.batch_size.unwrap_or(defaults.batch_size),
        overscan: config.overscan.unwrap_or(defaults.overscan),
        tail_interval_ms: config.tail_interval_ms.unwrap_or(defaults.tail_interval_ms),
        resize_debounce_ms: config
            .resize_debounce_ms
            .unwrap_or(defaults.resize_debounce_ms),
        response_time_ms: config.response_time_ms.unwrap_or(defaults.response_time_ms),
        fetch_timeout_ms: config.fetch_timeout_ms.unwrap_or(defaults.fetch_timeout_ms),
        initial_rows: config.initial_rows.unwrap_or(defaults.initial_rows),
        calibration_samples: config
            .calibration_samples
            .unwrap_or(defaults.calibration_samples),
        reanchor_newer: config.reanchor_newer.unwrap_or(defaults.reanchor_newer),
        reserve_placeholders: config
            .reserve_placeholders
            .unwrap_or(defaults.reserve_placeholders),
        font: config.font.unwrap_or(defaults.font),
        show_stats: config.show_stats.unwrap_or(defaults.show_stats),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Overrides taken from command-line flags; `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--batch-size`
    pub batch_size: Option<usize>,
    /// `--load-threshold`
    pub load_threshold: Option<usize>,
    /// `--overscan`
    pub overscan: Option<usize>,
    /// `--initial-rows`
    pub initial_rows: Option<usize>,
    /// `--response-time-ms`
    pub response_time_ms: Option<u64>,
    /// `--reserve-placeholders`
    pub reserve_placeholders: Option<bool>,
    /// `--stats` / `--no-stats`
    pub show_stats: Option<bool>,
    /// `--log-file`
    pub log_file_path: Option<PathBuf>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(threshold) = cli.load_threshold {
        config.load_threshold = threshold;
    }
    if let Some(overscan) = cli.overscan {
        config.overscan = overscan;
    }
    if let Some(initial_rows) = cli.initial_rows {
        config.initial_rows = initial_rows;
    }
    if let Some(response_time_ms) = cli.response_time_ms {
        config.response_time_ms = response_time_ms;
    }
    if let Some(reserve) = cli.reserve_placeholders {
        config.reserve_placeholders = reserve;
    }
    if let Some(show_stats) = cli.show_stats {
        config.show_stats = show_stats;
    }
    if let Some(path) = cli.log_file_path {
        config.log_file_path = path;
    }
    config
}

/// Run the full precedence chain and validate the result.
///
/// # Errors
///
/// Any read, parse, env or validation failure.
pub fn resolve(
    config_path: Option<PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    apply_cli_overrides(config, cli).validate()
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_logwindow_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("logwindow.log"),
            "Default log path should end with 'logwindow.log', got: {:?}",
            path
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(resolved.log_file_path, custom_path);
    }
}
