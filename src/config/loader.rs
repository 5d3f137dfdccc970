//! Configuration Loader
//!
//! Layers defaults, an optional file and environment overrides with the
//! `config` crate, then validates the merged result.

use super::error::{ConfigResult, ConfigurationError};
use super::RunnerConfig;
use crate::constants::CONFIG_ENV_PREFIX;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_file(mut self, file: Option<&Path>) -> Self {
        self.file = file.map(Path::to_path_buf);
        self
    }

    /// Override the environment prefix (`RUNNER` by default).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> ConfigResult<RunnerConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&RunnerConfig::default())?);

        if let Some(file) = &self.file {
            if !file.is_file() {
                return Err(ConfigurationError::file_not_found(file.display().to_string()));
            }
            debug!(path = %file.display(), "Loading runner configuration file");
            builder = builder.add_source(File::from(file.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("resolver.reference_extensions"),
        );

        let config: RunnerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            discriminator = %config.resolver.discriminator,
            sentinel = %config.resolver.reference_sentinel,
            extensions = ?config.resolver.reference_extensions,
            max_reference_depth = config.resolver.max_reference_depth,
            "Runner configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerConfig {
    /// Load configuration from defaults, an optional file and `RUNNER__*` variables.
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        ConfigLoader::new().with_file(file).load()
    }
}
