//! # Tree Resolver
//!
//! Rewrites a raw data tree into a component graph, bottom-up.
//!
//! ## Rules
//!
//! - **Mapping**: every value except the discriminator is resolved first, then
//!   the whole mapping is offered to the [`Factory`]. Success replaces the node
//!   with the constructed object. Parameter, unknown-kind and construction
//!   failures are logged at debug level and the resolved mapping is kept; any
//!   other failure aborts resolution.
//! - **Sequence**: each element is resolved in order.
//! - **String starting with the sentinel**: if the rest names a loadable
//!   document, its `data` payload is resolved with the same factory and takes
//!   the string's place. Otherwise the string is kept as is.
//! - **Anything else** is returned unchanged.
//!
//! References are tracked along the current expansion chain: re-entering a
//! document that is still being expanded is reported as a circular reference,
//! and chains longer than the configured depth are rejected.
//!
//! ## Usage
//!
//! ```rust
//! use runner_core::models::Node;
//! use runner_core::registry::ComponentRegistry;
//! use runner_core::resolver::{MemoryReferenceLoader, Resolver};
//! use serde_json::json;
//!
//! let registry = ComponentRegistry::new();
//! let loader = MemoryReferenceLoader::new().with_document("answer.json", json!({"data": 42}));
//! let resolver = Resolver::new(&registry, &loader);
//!
//! let resolved = resolver.resolve(Node::from(json!(["/answer.json", 1]))).unwrap();
//! assert_eq!(resolved, Node::from(json!([42, 1])));
//! ```

pub mod reference;

pub use reference::{FsReferenceLoader, MemoryReferenceLoader, ReferenceLoader};

use crate::config::ResolverConfig;
use crate::error::{Result, RunnerError};
use crate::models::{Mapping, Node};
use crate::registry::Factory;
use std::path::PathBuf;
use tracing::{debug, trace};

pub struct Resolver<'a> {
    factory: &'a dyn Factory,
    references: &'a dyn ReferenceLoader,
    discriminator: String,
    sentinel: String,
    max_reference_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(factory: &'a dyn Factory, references: &'a dyn ReferenceLoader) -> Self {
        Self::with_config(factory, references, &ResolverConfig::default())
    }

    pub fn with_config(
        factory: &'a dyn Factory,
        references: &'a dyn ReferenceLoader,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            factory,
            references,
            discriminator: config.discriminator.clone(),
            sentinel: config.reference_sentinel.clone(),
            max_reference_depth: config.max_reference_depth,
        }
    }

    /// Resolve a whole tree. The input is consumed and returned rewritten.
    pub fn resolve(&self, node: Node) -> Result<Node> {
        let mut chain = ReferenceChain::default();
        self.resolve_node(node, &mut chain)
    }

    fn resolve_node(&self, node: Node, chain: &mut ReferenceChain) -> Result<Node> {
        match node {
            Node::Mapping(mapping) => self.resolve_mapping(mapping, chain),
            Node::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve_node(item, chain))
                .collect::<Result<Vec<_>>>()
                .map(Node::Sequence),
            Node::String(text) => self.resolve_string(text, chain),
            other => Ok(other),
        }
    }

    fn resolve_mapping(&self, mut mapping: Mapping, chain: &mut ReferenceChain) -> Result<Node> {
        for (key, value) in mapping.iter_mut() {
            if *key == self.discriminator {
                continue;
            }
            *value = self.resolve_node(std::mem::take(value), chain)?;
        }

        match self.factory.construct(&mapping) {
            Ok(component) => {
                trace!(kind = component.kind(), "Resolved object node");
                Ok(Node::Object(component))
            }
            Err(error) if error.is_recoverable() => {
                debug!(error = %error, "Keeping mapping as data");
                Ok(Node::Mapping(mapping))
            }
            Err(error) => Err(error.into()),
        }
    }

    fn resolve_string(&self, text: String, chain: &mut ReferenceChain) -> Result<Node> {
        let Some(target) = text.strip_prefix(self.sentinel.as_str()) else {
            return Ok(Node::String(text));
        };
        let Some(location) = self.references.locate(target) else {
            return Ok(Node::String(text));
        };

        chain.enter(location.clone(), self.max_reference_depth)?;
        debug!(reference = %text, path = %location.display(), "Expanding reference");
        let payload = self.references.load(&location)?;
        let resolved = self.resolve_node(Node::from(payload), chain)?;
        chain.leave();
        Ok(resolved)
    }
}

/// Documents currently being expanded, outermost first.
#[derive(Debug, Default)]
struct ReferenceChain {
    locations: Vec<PathBuf>,
}

impl ReferenceChain {
    fn enter(&mut self, location: PathBuf, max_depth: usize) -> Result<()> {
        if self.locations.contains(&location) {
            let chain = self
                .locations
                .iter()
                .chain(std::iter::once(&location))
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(RunnerError::CircularReference { chain });
        }
        if self.locations.len() >= max_depth {
            return Err(RunnerError::ReferenceDepthExceeded {
                limit: max_depth,
                path: location.display().to_string(),
            });
        }
        self.locations.push(location);
        Ok(())
    }

    fn leave(&mut self) {
        self.locations.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Noop;
    use crate::registry::{ComponentRegistry, ConstructError};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register("Noop", |params| {
            params.finish()?;
            Ok(Arc::new(Noop))
        });
        registry.register("Broken", |params| {
            Err(ConstructError::internal(params.kind(), "registry poisoned"))
        });
        registry
    }

    #[test]
    fn test_scalars_are_unchanged() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new();
        let resolver = Resolver::new(&registry, &loader);

        for value in [json!(null), json!(true), json!(3.5), json!("text")] {
            assert_eq!(resolver.resolve(Node::from(value.clone())).unwrap(), Node::from(value));
        }
    }

    #[test]
    fn test_registered_mapping_becomes_object() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new();
        let resolver = Resolver::new(&registry, &loader);

        let resolved = resolver.resolve(Node::from(json!({"class": "Noop"}))).unwrap();
        assert!(resolved.downcast_ref::<Noop>().is_some());
    }

    #[test]
    fn test_empty_mapping_stays_empty_mapping() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new();
        let resolver = Resolver::new(&registry, &loader);

        let resolved = resolver.resolve(Node::Mapping(Mapping::new())).unwrap();
        assert_eq!(resolved, Node::Mapping(Mapping::new()));
    }

    #[test]
    fn test_internal_error_propagates() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new();
        let resolver = Resolver::new(&registry, &loader);

        let err = resolver
            .resolve(Node::from(json!([{"class": "Broken"}])))
            .unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Construct(ConstructError::Internal { .. })
        ));
    }

    #[test]
    fn test_self_reference_is_circular() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new().with_document("loop.json", json!({"data": ["/loop.json"]}));
        let resolver = Resolver::new(&registry, &loader);

        let err = resolver.resolve(Node::from("/loop.json")).unwrap_err();
        match err {
            RunnerError::CircularReference { chain } => {
                assert_eq!(chain, "loop.json -> loop.json");
            }
            other => panic!("expected circular reference, got {other:?}"),
        }
    }

    #[test]
    fn test_sibling_references_to_same_document_are_allowed() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new().with_document("one.json", json!({"data": 1}));
        let resolver = Resolver::new(&registry, &loader);

        let resolved = resolver
            .resolve(Node::from(json!(["/one.json", "/one.json", {"v": "/one.json"}])))
            .unwrap();
        assert_eq!(resolved, Node::from(json!([1, 1, {"v": 1}])));
    }

    #[test]
    fn test_depth_limit() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new()
            .with_document("a.json", json!({"data": "/b.json"}))
            .with_document("b.json", json!({"data": "/c.json"}))
            .with_document("c.json", json!({"data": "leaf"}));
        let config = ResolverConfig {
            max_reference_depth: 2,
            ..ResolverConfig::default()
        };
        let resolver = Resolver::with_config(&registry, &loader, &config);

        let err = resolver.resolve(Node::from("/a.json")).unwrap_err();
        assert!(matches!(err, RunnerError::ReferenceDepthExceeded { limit: 2, .. }));

        let shallow = resolver.resolve(Node::from("/b.json")).unwrap();
        assert_eq!(shallow, Node::from("leaf"));
    }

    #[test]
    fn test_custom_sentinel() {
        let registry = registry();
        let loader = MemoryReferenceLoader::new().with_document("x.json", json!({"data": 7}));
        let config = ResolverConfig {
            reference_sentinel: "@".to_string(),
            ..ResolverConfig::default()
        };
        let resolver = Resolver::with_config(&registry, &loader, &config);

        assert_eq!(resolver.resolve(Node::from("@x.json")).unwrap(), Node::from(json!(7)));
        assert_eq!(resolver.resolve(Node::from("/x.json")).unwrap(), Node::from("/x.json"));
    }
}
