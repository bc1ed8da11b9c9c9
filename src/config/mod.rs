//! Configuration module.
//!
//! Settings come from four layers, lowest precedence first: built-in
//! defaults, a TOML file, `SCOPELOG_*` environment variables, and command
//! line flags. See [`loader`] for each step.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, ResolvedConfig,
};

use serde::Deserialize;

/// How finished trees are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree drawing.
    #[default]
    Text,
    /// Pretty-printed JSON snapshot.
    Json,
}
