//! # Runner Configuration
//!
//! Settings that shape resolution and logging, independent of any single
//! input document.
//!
//! ## Sources
//!
//! Layered by [`RunnerConfig::load`], later sources winning:
//!
//! 1. Built-in defaults ([`RunnerConfig::default`])
//! 2. An optional configuration file (TOML, YAML or JSON by extension)
//! 3. Environment variables: `RUNNER__RESOLVER__DISCRIMINATOR=kind`,
//!    `RUNNER__RESOLVER__REFERENCE_EXTENSIONS=json,yaml`, `RUNNER__LOGGING__FORMAT=json`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use runner_core::config::RunnerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunnerConfig::load(None)?;
//! assert_eq!(config.resolver.discriminator, "class");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::{
    DEFAULT_DISCRIMINATOR, DEFAULT_MAX_REFERENCE_DEPTH, DEFAULT_REFERENCE_EXTENSIONS,
    DEFAULT_REFERENCE_SENTINEL,
};
use crate::models::DocumentFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Mapping key naming the component kind.
    pub discriminator: String,
    /// Prefix that marks a string as a file reference.
    pub reference_sentinel: String,
    /// File extensions (without the dot) a reference target must carry.
    pub reference_extensions: Vec<String>,
    /// Directory references resolve against; the working directory when unset.
    pub reference_root: Option<PathBuf>,
    /// Longest chain of nested references before resolution fails.
    pub max_reference_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            reference_sentinel: DEFAULT_REFERENCE_SENTINEL.to_string(),
            reference_extensions: DEFAULT_REFERENCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            reference_root: None,
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Mirror warnings and errors to stderr in addition to the log file.
    pub console: bool,
}

impl RunnerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.resolver.validate()
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.discriminator.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "resolver.discriminator",
                "",
                "Discriminator key must not be empty",
            ));
        }
        if self.reference_sentinel.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "resolver.reference_sentinel",
                "",
                "Every string would be treated as a reference",
            ));
        }
        if self.reference_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(ConfigurationError::invalid_value(
                "resolver.reference_extensions",
                format!("{:?}", self.reference_extensions),
                "At least one extension is required",
            ));
        }
        if let Some(unparseable) = self
            .reference_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.'))
            .find(|ext| !ext.is_empty() && DocumentFormat::from_extension(ext).is_none())
        {
            return Err(ConfigurationError::invalid_value(
                "resolver.reference_extensions",
                unparseable,
                "Referenced documents must be JSON or YAML",
            ));
        }
        if self.max_reference_depth == 0 {
            return Err(ConfigurationError::invalid_value(
                "resolver.max_reference_depth",
                "0",
                "Must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.resolver.discriminator, "class");
        assert_eq!(config.resolver.reference_sentinel, "/");
        assert_eq!(config.resolver.reference_extensions, vec!["json"]);
        assert_eq!(config.resolver.max_reference_depth, 64);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_discriminator() {
        let mut config = RunnerConfig::default();
        config.resolver.discriminator.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_depth_and_no_extensions() {
        let mut config = RunnerConfig::default();
        config.resolver.max_reference_depth = 0;
        assert!(config.validate().is_err());

        let mut config = RunnerConfig::default();
        config.resolver.reference_extensions = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unparseable_extensions() {
        let mut config = RunnerConfig::default();
        config.resolver.reference_extensions = vec!["json".to_string(), "txt".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));

        config.resolver.reference_extensions = vec![".yaml".to_string(), "yml".to_string()];
        assert!(config.validate().is_ok());
    }
}
