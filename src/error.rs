//! # Runner Error Types
//!
//! Crate-level error type. Construction failures that the resolver is allowed to
//! swallow live in [`crate::registry::ConstructError`]; everything that reaches
//! this type aborts the run.

use crate::config::ConfigurationError;
use crate::registry::{ConstructError, InvokeError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Document {path} is malformed: {reason}")]
    MalformedDocument { path: String, reason: String },

    #[error("Document {path} has no `data` field")]
    MissingData { path: String },

    #[error("Circular reference detected: {chain}")]
    CircularReference { chain: String },

    #[error("Reference depth limit of {limit} exceeded while expanding {path}")]
    ReferenceDepthExceeded { limit: usize, path: String },

    #[error("Resolved root is not invokable: found {found}")]
    RootNotInvokable { found: String },

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Construct(#[from] ConstructError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl RunnerError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing_data(path: &Path) -> Self {
        Self::MissingData {
            path: path.display().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
