//! Compiler configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via --config or FSMC_CONFIG)
//! 3. Environment variables

use fsmc_core::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Compiler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,
    /// Label configuration.
    pub label: LabelConfig,
    /// Parser configuration.
    pub parse: ParseConfig,
}

impl Config {
    /// Loads configuration from an explicit file (or defaults), then applies
    /// environment overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.output.apply_env_overrides();
        self.label.apply_env_overrides();
        self.parse.apply_env_overrides();
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.required_suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "label.required_suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output format for rendered specs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Flowchart dialect Mermaid text.
    Mermaid,
    /// Structured YAML spec.
    #[default]
    FsmSpec,
}

impl OutputFormat {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "mermaid" => Some(OutputFormat::Mermaid),
            "fsm-spec" | "fsm_spec" | "yaml" => Some(OutputFormat::FsmSpec),
            _ => None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when a command does not pass --output.
    pub format: OutputFormat,
}

impl OutputConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(format) = std::env::var("FSMC_OUTPUT") {
            if let Some(parsed) = OutputFormat::from_env_value(&format) {
                self.format = parsed;
            }
        }
    }
}

/// Label configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Suffix every target label must end with.
    pub required_suffix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            required_suffix: "AbciApp".to_string(),
        }
    }
}

impl LabelConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(suffix) = std::env::var("FSMC_LABEL_SUFFIX") {
            self.required_suffix = suffix;
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Fail instead of guessing when no state lacks incoming transitions.
    pub strict_start: bool,
}

impl ParseConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(strict) = std::env::var("FSMC_STRICT_START") {
            self.strict_start = strict == "1" || strict.to_lowercase() == "true";
        }
    }

    /// Returns the parser options this configuration selects.
    pub fn options(&self) -> ParseOptions {
        if self.strict_start {
            ParseOptions::strict()
        } else {
            ParseOptions::default()
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
