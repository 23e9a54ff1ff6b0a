//! Configuration for G.729 decoding sessions.
//!
//! Settings are read from a TOML file in the platform config directory.
//! Missing files and missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::buffer::HeapAllocator;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Voice activity detection flag. Carried per session, not yet acted on.
    pub vad: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Largest output buffer the heap allocator will hand out
    pub max_buffer_bytes: Option<usize>,
}

impl OutputConfig {
    /// Build the heap allocator described by this section
    #[must_use]
    pub fn allocator(&self) -> HeapAllocator {
        match self.max_buffer_bytes {
            Some(max) => HeapAllocator::with_limit(max),
            None => HeapAllocator::new(),
        }
    }
}

impl Config {
    /// Get the path to the configuration file
    #[must_use]
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "github", "g729-frame-adapter")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Load configuration from disk, or return defaults if not found
    #[must_use]
    pub fn load() -> Self {
        Self::try_load().unwrap_or_default()
    }

    /// Try to load configuration from disk
    pub fn try_load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    /// Load configuration from a specific file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
