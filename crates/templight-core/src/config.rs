//! Highlighter configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! Serde is Rust's standard for serialization/deserialization.
//! The `#[derive(Serialize, Deserialize)]` macro generates
//! code to convert structs to/from JSON, TOML, etc.
//!
//! `#[serde(default)]` uses Default::default() for missing fields,
//! so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use templight_syntax::{Delimiters, SyntaxError};

use crate::decoration::Attributes;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fragment marker patterns
    pub delimiters: DelimiterConfig,

    /// Classes and attributes put on decorations
    pub decorations: DecorationConfig,

    /// Grammar selection and caching
    pub highlight: HighlightConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Falling back to default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("templight").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config to a specific path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Fragment marker patterns, as regular expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimiterConfig {
    /// Opening marker
    pub open: String,

    /// Closing marker
    pub close: String,
}

impl DelimiterConfig {
    /// Compiles the patterns.
    pub fn compile(&self) -> Result<Delimiters, SyntaxError> {
        Delimiters::new(&self.open, &self.close)
    }
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            open: Delimiters::DEFAULT_OPEN.to_string(),
            close: Delimiters::DEFAULT_CLOSE.to_string(),
        }
    }
}

/// Classes and attributes for region-level decorations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Line class for every line of a block region
    pub code_block_class: String,

    /// Mark class over a whole inline region
    pub inline_code_class: String,

    /// Attributes on both of the above
    pub attributes: Attributes,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("data-templater-code".to_string(), String::new());
        attributes.insert("spellcheck".to_string(), "false".to_string());
        Self {
            code_block_class: "HyperMD-codeblock HyperMD-codeblock-bg".to_string(),
            inline_code_class: "cm-inline-code".to_string(),
            attributes,
        }
    }
}

/// Highlighting behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Grammar for fragment bodies
    pub language: String,

    /// Reuse token spans for fragments whose text did not change
    pub memoize_regions: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            memoize_regions: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
