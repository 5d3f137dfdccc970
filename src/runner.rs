//! # Runner
//!
//! Program flow around the resolver: prepare the input document, set up
//! logging, resolve the `data` payload once and invoke the result.
//!
//! ```text
//! input.json ──▶ prepare_input ──▶ init_logging ──▶ Resolver::resolve ──▶ root.invoke()
//!                (metadata merge)                   (registry + references)
//! ```

use crate::components::register_builtin_components;
use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError};
use crate::logging::{init_logging, log_run_environment, LogSettings};
use crate::models::{Document, LogLevel, Node};
use crate::registry::ComponentRegistry;
use crate::resolver::{FsReferenceLoader, Resolver};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Command-line level inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub config_path: Option<PathBuf>,
}

/// Input document with its metadata merged and defaulted.
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub input_path: PathBuf,
    pub document: Document,
    pub log_path: PathBuf,
    pub log_level: LogLevel,
}

/// Load the input document and merge option values into its metadata.
///
/// Options win over document metadata. The log path defaults to the input path
/// with a `.log` extension and the level to `INFO`.
pub fn prepare_input(options: &RunOptions) -> Result<PreparedInput> {
    let input_path = std::fs::canonicalize(&options.input_path)
        .map_err(|e| RunnerError::io(&options.input_path, e))?;
    let mut document = Document::from_path(&input_path)?;

    let metadata = &mut document.metadata;
    metadata.input_path = Some(input_path.clone());
    if let Some(log_path) = &options.log_path {
        metadata.log_path = Some(log_path.clone());
    }
    if let Some(log_level) = options.log_level {
        metadata.log_level = Some(log_level);
    }
    let log_path = metadata
        .log_path
        .get_or_insert_with(|| input_path.with_extension("log"))
        .clone();
    let log_level = *metadata.log_level.get_or_insert(LogLevel::Info);

    Ok(PreparedInput {
        input_path,
        document,
        log_path,
        log_level,
    })
}

/// Resolves payloads against a registry and invokes the resulting root.
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunnerConfig,
    registry: ComponentRegistry,
}

impl Runner {
    /// Runner with the built-in components registered.
    pub fn new(config: RunnerConfig) -> Self {
        let mut registry = ComponentRegistry::with_discriminator(&config.resolver.discriminator);
        register_builtin_components(&mut registry);
        Self { config, registry }
    }

    /// Runner with a caller-supplied registry. The registry's discriminator
    /// replaces `config.resolver.discriminator` so the resolver skips the same
    /// key the registry reads.
    pub fn with_registry(mut config: RunnerConfig, registry: ComponentRegistry) -> Self {
        if config.resolver.discriminator != registry.discriminator() {
            warn!(
                configured = %config.resolver.discriminator,
                registry = %registry.discriminator(),
                "Configured discriminator differs from the registry's; using the registry's"
            );
            config.resolver.discriminator = registry.discriminator().to_string();
        }
        Self { config, registry }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    fn reference_loader(&self) -> Result<FsReferenceLoader> {
        let resolver = &self.config.resolver;
        resolver.validate()?;
        let loader = match &resolver.reference_root {
            Some(root) => FsReferenceLoader::new(root),
            None => FsReferenceLoader::from_current_dir()?,
        };
        Ok(loader.with_extensions(resolver.reference_extensions.iter().cloned()))
    }

    /// Resolve a payload into a node tree.
    pub fn initialize(&self, data: Value) -> Result<Node> {
        let loader = self.reference_loader()?;
        Resolver::with_config(&self.registry, &loader, &self.config.resolver).resolve(Node::from(data))
    }

    /// Resolve a payload and invoke the resulting root exactly once.
    pub fn execute(&self, data: Value) -> Result<()> {
        let root = self.initialize(data)?;
        let Node::Object(action) = root else {
            return Err(RunnerError::RootNotInvokable {
                found: root.kind_name(),
            });
        };

        info!(kind = action.kind(), "Invoking resolved root");
        action.invoke()?;
        info!(kind = action.kind(), "Run completed");
        Ok(())
    }
}

/// Full program flow for one input file.
///
/// Configuration and input errors surface before logging is set up; failures
/// after that point are also written to the run log.
pub fn run(options: &RunOptions) -> Result<()> {
    let config = RunnerConfig::load(options.config_path.as_deref())?;
    let prepared = prepare_input(options)?;

    let settings = LogSettings {
        log_path: prepared.log_path.clone(),
        log_level: prepared.log_level,
        config: config.logging.clone(),
    };
    let _guard = init_logging(&settings)?;
    log_run_environment(&prepared.input_path, &settings);
    info!(input = %prepared.document.to_value(), "Run input");

    let runner = Runner::new(config);
    runner
        .execute(prepared.document.data)
        .inspect_err(|e| log_failure(&prepared.input_path, e))
}

fn log_failure(input_path: &Path, error: &RunnerError) {
    error!(
        input_path = %input_path.display(),
        error = %error,
        details = ?error,
        "Run failed"
    );
}
