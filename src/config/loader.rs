//! Configuration file loading with precedence handling.

use crate::config::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SCOPELOG_CONFIG";
/// Environment variable overriding the bind address.
pub const BIND_ENV: &str = "SCOPELOG_BIND";
/// Environment variable overriding the port.
pub const PORT_ENV: &str = "SCOPELOG_PORT";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4445;
const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} in {var}")]
    InvalidEnvValue {
        /// Variable name.
        var: &'static str,
        /// Value found.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; anything left out falls back to the defaults in
/// [`ResolvedConfig`]. Lives at `~/.config/scopelog/config.toml` by default.
///
/// ```toml
/// bind_address = "0.0.0.0"
/// port = 5000
/// output_format = "json"
/// read_timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Address the listener binds to.
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Port the listener binds to. 0 picks a free port.
    #[serde(default)]
    pub port: Option<u16>,

    /// Path of the tracing log file.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// How finished trees are printed.
    #[serde(default)]
    pub output_format: Option<OutputFormat>,

    /// Per-connection read timeout in seconds. 0 disables it.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    /// How often the console checks for finished trees, in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Address the listener binds to.
    pub bind_address: String,
    /// Port the listener binds to.
    pub port: u16,
    /// Path of the tracing log file.
    pub log_file_path: PathBuf,
    /// How finished trees are printed.
    pub output_format: OutputFormat,
    /// Per-connection read timeout; `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Console poll interval.
    pub poll_interval: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            log_file_path: default_log_path(),
            output_format: OutputFormat::default(),
            read_timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl ResolvedConfig {
    /// `bind_address:port`, ready for `TcpListener::bind`.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/scopelog/scopelog.log` on Linux, the platform
/// equivalent elsewhere, or `scopelog.log` in the working directory when no
/// state directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("scopelog").join("scopelog.log"),
        None => PathBuf::from("scopelog.log"),
    }
}

/// Resolve default config file path.
///
/// Returns `None` if the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scopelog").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

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

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SCOPELOG_CONFIG` environment variable
/// 3. [`default_config_path`]
///
/// # Errors
///
/// Returns error only if the chosen file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        bind_address: config.bind_address.unwrap_or(defaults.bind_address),
        port: config.port.unwrap_or(defaults.port),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        output_format: config.output_format.unwrap_or(defaults.output_format),
        read_timeout: config
            .read_timeout_secs
            .map_or(defaults.read_timeout, timeout_from_secs),
        poll_interval: config
            .poll_interval_ms
            .map_or(defaults.poll_interval, Duration::from_millis),
    }
}

/// Apply `SCOPELOG_BIND` and `SCOPELOG_PORT` on top of `config`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvValue`] if `SCOPELOG_PORT` is not a port
/// number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(bind) = std::env::var(BIND_ENV) {
        config.bind_address = bind;
    }

    if let Ok(port) = std::env::var(PORT_ENV) {
        config.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvValue {
                var: PORT_ENV,
                value: port.clone(),
            })?;
    }

    Ok(config)
}

/// Flags given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--bind`
    pub bind_address: Option<String>,
    /// `--port`
    pub port: Option<u16>,
    /// `--log-file`
    pub log_file_path: Option<PathBuf>,
    /// `--format`
    pub output_format: Option<OutputFormat>,
    /// `--read-timeout`, seconds; 0 disables the timeout.
    pub read_timeout_secs: Option<u64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(bind) = cli.bind_address {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = cli.log_file_path {
        config.log_file_path = path;
    }
    if let Some(format) = cli.output_format {
        config.output_format = format;
    }
    if let Some(secs) = cli.read_timeout_secs {
        config.read_timeout = timeout_from_secs(secs);
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
