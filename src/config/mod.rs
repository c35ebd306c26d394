//! Configuration management.

mod file_config;
mod rules;

pub use file_config::{ConfigFile, ConfigFileError};
pub use rules::{BucketCaps, ClassifierRules, LanguageRule, RuleError, TopicRule};

pub(crate) use rules::{compile, compile_all};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `PAPER_MDC_OUTPUT__WORKSPACE_ROOT`
pub const ENV_PREFIX: &str = "PAPER_MDC";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Heuristic tables
    #[serde(default)]
    pub rules: ClassifierRules,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where generated documents go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root that holds the topic folders
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    /// Whether to look for existing documents related to a new one
    #[serde(default = "default_true")]
    pub find_related: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            find_related: true,
        }
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Load configuration from a file, with `PAPER_MDC_*` environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the default locations.
///
/// Checks `./paper-mdc.toml`, then `<config dir>/paper-mdc/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("paper-mdc.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("paper-mdc").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
