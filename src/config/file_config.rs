//! Configuration file support for paper-mdc.
//!
//! Writing the default file gives users every table to edit.
//!
//! # Configuration File Format
//!
//! ```toml
//! [output]
//! workspace_root = "./references"
//! find_related = true
//!
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [rules]
//! fallback_topic = "ai"
//! limitation_keywords = ["limitation", "assumption"]
//!
//! [rules.caps]
//! limitations = 15
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ClassifierRules, Config, LoggingConfig, OutputConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Output section
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rule tables
    #[serde(default)]
    pub rules: ClassifierRules,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let file: Self =
            toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        file.rules
            .validate()
            .map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        Ok(file)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Convert into the runtime configuration
    pub fn into_config(self) -> Config {
        Config {
            output: self.output,
            rules: self.rules,
            logging: self.logging,
        }
    }
}

impl From<Config> for ConfigFile {
    fn from(config: Config) -> Self {
        Self {
            output: config.output,
            logging: config.logging,
            rules: config.rules,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
