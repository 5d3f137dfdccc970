//! # Structured-Data Documents
//!
//! Input and referenced documents share one shape: an optional `metadata`
//! mapping with execution parameters and a required `data` payload. Only the
//! input document's `metadata` is interpreted; referenced documents contribute
//! their `data` alone.
//!
//! ```json
//! {
//!   "metadata": {"log_level": "DEBUG"},
//!   "data": {"class": "Pipeline", "steps": ["/steps.json", {"class": "Noop"}]}
//! }
//! ```

use crate::constants::fields;
use crate::error::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

/// On-disk encodings a document may use, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Format for a bare extension (no leading dot), ignoring ASCII case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn parse(self, path: &Path, content: &str) -> Result<Value> {
        match self {
            Self::Json => {
                serde_json::from_str(content).map_err(|e| RunnerError::parse(path, e.to_string()))
            }
            Self::Yaml => {
                serde_yaml::from_str(content).map_err(|e| RunnerError::parse(path, e.to_string()))
            }
        }
    }
}

/// Logging verbosity names accepted in metadata and on the command line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Critical,
    Fatal,
    Error,
    Warning,
    Warn,
    #[default]
    Info,
    Debug,
    Notset,
}

impl LogLevel {
    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Critical | LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning | LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Notset => LevelFilter::TRACE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Critical => "CRITICAL",
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Notset => "NOTSET",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution parameters carried next to the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    /// Keys the runner does not interpret, kept for logging.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub data: Value,
}

impl Document {
    /// Read and parse a document. The file handle is released before returning.
    pub fn from_path(path: &Path) -> Result<Self> {
        let value = read_value(path)?;
        Self::from_value(path, value)
    }

    /// Split a parsed top-level value into metadata and payload.
    pub fn from_value(path: &Path, value: Value) -> Result<Self> {
        let mut root = into_root(path, value)?;
        let data = take_data(path, &mut root)?;

        let metadata = match root.remove(fields::METADATA) {
            None | Some(Value::Null) => Metadata::default(),
            Some(raw) => serde_json::from_value(raw)
                .map_err(|e| RunnerError::malformed(path, format!("invalid metadata: {e}")))?,
        };

        Ok(Self { metadata, data })
    }

    /// Read only the `data` payload of a document, as referenced documents
    /// are. Anything else at the top level, `metadata` included, is ignored.
    pub fn read_data(path: &Path) -> Result<Value> {
        let value = read_value(path)?;
        Self::data_from_value(path, value)
    }

    /// The `data` payload of a parsed top-level value; other keys are ignored.
    pub fn data_from_value(path: &Path, value: Value) -> Result<Value> {
        let mut root = into_root(path, value)?;
        take_data(path, &mut root)
    }

    /// The whole document as a value, for logging the run input.
    pub fn to_value(&self) -> Value {
        let mut root = serde_json::Map::new();
        root.insert(
            fields::METADATA.to_string(),
            serde_json::to_value(&self.metadata).unwrap_or(Value::Null),
        );
        root.insert(fields::DATA.to_string(), self.data.clone());
        Value::Object(root)
    }
}

fn read_value(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| RunnerError::malformed(path, "unrecognized document extension"))?;
    let content = std::fs::read_to_string(path).map_err(|e| RunnerError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "Read document");
    format.parse(path, &content)
}

fn into_root(path: &Path, value: Value) -> Result<serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RunnerError::malformed(
            path,
            format!("expected a top-level mapping, found {}", json_kind(&other)),
        )),
    }
}

fn take_data(path: &Path, root: &mut serde_json::Map<String, Value>) -> Result<Value> {
    root.remove(fields::DATA)
        .ok_or_else(|| RunnerError::missing_data(path))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
