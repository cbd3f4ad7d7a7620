//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the converter
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConverterError, ConverterResult};

use super::types::ConverterConfig;

/// Loads and provides access to converter configuration.
///
/// # Example
///
/// ```no_run
/// use leave_converter::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./leave-converter.yaml")?;
/// println!("Header row: {}", loader.config().import.header_row);
/// # Ok::<(), leave_converter::error::ConverterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ConverterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist or cannot be read (`ConfigNotFound`)
    /// - The file is not valid YAML for [`ConverterConfig`] (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> ConverterResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ConverterError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| ConverterError::ConfigParseError {
            path: path_str.clone(),
            message,
        })?;

        debug!(path = %path_str, "Loaded configuration");
        Ok(Self { config })
    }

    /// Loads configuration from `path` when given, otherwise uses defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> ConverterResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    fn parse(content: &str) -> Result<ConverterConfig, String> {
        // An empty file deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(ConverterConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ConverterConfig {
        self.config
    }
}
