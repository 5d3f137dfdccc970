//! # Component Registry
//!
//! Maps discriminator tags to builder closures. Kinds register at startup; the
//! resolver only sees the [`Factory`] contract.
//!
//! ## Usage
//!
//! ```rust
//! use runner_core::models::{Mapping, Node};
//! use runner_core::registry::{ComponentRegistry, Factory};
//! use runner_core::components::Noop;
//! use std::sync::Arc;
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register("Noop", |params| {
//!     params.finish()?;
//!     Ok(Arc::new(Noop))
//! });
//!
//! let mut mapping = Mapping::new();
//! mapping.insert("class".to_string(), Node::from("Noop"));
//! let component = registry.construct(&mapping).unwrap();
//! assert_eq!(component.kind(), "Noop");
//! ```

use super::component::Component;
use super::errors::ConstructError;
use super::params::Params;
use crate::constants::DEFAULT_DISCRIMINATOR;
use crate::models::{Mapping, Node};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Construction entry point consumed by the resolver.
pub trait Factory {
    /// Build a component from a mapping whose parameter values are already resolved.
    fn construct(&self, mapping: &Mapping) -> Result<Arc<dyn Component>, ConstructError>;
}

pub type ComponentBuilder =
    Arc<dyn Fn(Params) -> Result<Arc<dyn Component>, ConstructError> + Send + Sync>;

#[derive(Clone)]
pub struct ComponentRegistry {
    discriminator: String,
    builders: HashMap<String, ComponentBuilder>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::with_discriminator(DEFAULT_DISCRIMINATOR)
    }

    pub fn with_discriminator(discriminator: impl Into<String>) -> Self {
        let discriminator = discriminator.into();
        info!(discriminator = %discriminator, "Creating new ComponentRegistry");
        Self {
            discriminator,
            builders: HashMap::new(),
        }
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Register a builder for `kind`, replacing any existing one.
    pub fn register<F>(&mut self, kind: impl Into<String>, builder: F) -> &mut Self
    where
        F: Fn(Params) -> Result<Arc<dyn Component>, ConstructError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.builders.contains_key(&kind) {
            warn!(kind = %kind, "Component already registered, replacing");
        }
        debug!(kind = %kind, "Registering component builder");
        self.builders.insert(kind, Arc::new(builder));
        self
    }

    pub fn unregister(&mut self, kind: &str) -> bool {
        self.builders.remove(kind).is_some()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.builders.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory for ComponentRegistry {
    fn construct(&self, mapping: &Mapping) -> Result<Arc<dyn Component>, ConstructError> {
        let kind = match mapping.get(&self.discriminator) {
            None => return Err(ConstructError::unknown_kind(&self.discriminator, None)),
            Some(Node::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ConstructError::parameter(
                    &self.discriminator,
                    format!(
                        "discriminator `{}` must be a string, found {}",
                        self.discriminator,
                        other.kind_name()
                    ),
                ))
            }
        };

        let builder = self
            .builders
            .get(&kind)
            .ok_or_else(|| ConstructError::unknown_kind(&self.discriminator, Some(kind.clone())))?;

        let values: Mapping = mapping
            .iter()
            .filter(|(key, _)| **key != self.discriminator)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let component = builder(Params::new(kind.clone(), values))?;
        debug!(kind = %kind, "Constructed component");
        Ok(component)
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("discriminator", &self.discriminator)
            .field("kinds", &self.kinds())
            .finish()
    }
}
