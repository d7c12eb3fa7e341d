//! Configuration management
//!
//! Supports configuration via:
//! 1. Config file (~/.config/prompt-optimizer/config.toml)
//! 2. Environment variables (PROMPT_OPTIMIZER_RULES, PROMPT_OPTIMIZER_AGGRESSIVE)
//! 3. CLI arguments (override file/env settings)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Learned-rules source
    pub rules: RulesSettings,

    /// Optimization behavior
    pub optimization: OptimizationSettings,

    /// Report rendering
    pub report: ReportSettings,
}

/// Learned-rules settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    /// Default path to the learned-rules JSON document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Optimization settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    /// Apply aggressive keyword removal by default
    pub aggressive: bool,
}

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Before/after samples shown in the report
    pub sample_count: usize,

    /// Character prefix shown per sample
    pub sample_prefix_chars: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            sample_count: 5,
            sample_prefix_chars: 100,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prompt-optimizer")
            .join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from specific path
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default().with_env_overrides());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config.with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("PROMPT_OPTIMIZER_RULES") {
            self.rules.path = Some(PathBuf::from(path));
        }
        if let Ok(flag) = std::env::var("PROMPT_OPTIMIZER_AGGRESSIVE") {
            if let Ok(aggressive) = flag.parse() {
                self.optimization.aggressive = aggressive;
            }
        }

        self
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to specific path
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Generate example config content
    pub fn example() -> String {
        let example = Config::default();
        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

/// Builder for creating Config programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rules.path = Some(path.into());
        self
    }

    pub fn aggressive(mut self, aggressive: bool) -> Self {
        self.config.optimization.aggressive = aggressive;
        self
    }

    pub fn sample_count(mut self, count: usize) -> Self {
        self.config.report.sample_count = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
