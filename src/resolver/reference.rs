//! # Reference Loading
//!
//! The resolver delegates every filesystem concern to a [`ReferenceLoader`]:
//! deciding whether a sentinel-stripped target names a loadable document, and
//! reading that document's `data` payload. Keeping I/O behind this seam lets
//! the resolver run against in-memory fixtures.

use crate::constants::DEFAULT_REFERENCE_EXTENSIONS;
use crate::error::{Result, RunnerError};
use crate::models::Document;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait ReferenceLoader {
    /// Location of the document `target` names, or `None` when `target` is
    /// not a reference (no such file, or an unrecognized extension).
    fn locate(&self, target: &str) -> Option<PathBuf>;

    /// The `data` payload of the document at a location returned by [`locate`].
    ///
    /// [`locate`]: ReferenceLoader::locate
    fn load(&self, location: &Path) -> Result<Value>;
}

/// Loads references from disk, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsReferenceLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsReferenceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_REFERENCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    /// Loader rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| RunnerError::io(Path::new("."), e))?;
        Ok(Self::new(cwd))
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Extensions match exactly: `UP.JSON` is not a `json` reference.
    fn has_recognized_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

impl ReferenceLoader for FsReferenceLoader {
    fn locate(&self, target: &str) -> Option<PathBuf> {
        let path = self.root.join(target);
        if !self.has_recognized_extension(&path) || !path.exists() {
            return None;
        }
        // Canonical form gives every file one identity for cycle detection.
        Some(std::fs::canonicalize(&path).unwrap_or(path))
    }

    fn load(&self, location: &Path) -> Result<Value> {
        debug!(path = %location.display(), "Loading referenced document");
        Document::read_data(location)
    }
}

/// Serves reference payloads from memory, keyed by target path.
#[derive(Debug, Clone, Default)]
pub struct MemoryReferenceLoader {
    documents: HashMap<PathBuf, Value>,
}

impl MemoryReferenceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a whole document (a mapping that should carry a `data` field).
    pub fn insert(&mut self, target: impl Into<PathBuf>, document: Value) -> &mut Self {
        self.documents.insert(target.into(), document);
        self
    }

    pub fn with_document(mut self, target: impl Into<PathBuf>, document: Value) -> Self {
        self.insert(target, document);
        self
    }
}

impl ReferenceLoader for MemoryReferenceLoader {
    fn locate(&self, target: &str) -> Option<PathBuf> {
        let path = PathBuf::from(target);
        self.documents.contains_key(&path).then_some(path)
    }

    fn load(&self, location: &Path) -> Result<Value> {
        let document = self.documents.get(location).cloned().ok_or_else(|| {
            RunnerError::io(
                location,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such in-memory document"),
            )
        })?;
        Document::data_from_value(location, document)
    }
}
