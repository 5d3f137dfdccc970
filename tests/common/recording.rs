use runner_core::models::{Mapping, Node};
use runner_core::registry::{Component, ConstructError, Factory};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Component that remembers the parameters it was built from.
#[derive(Debug)]
pub struct Marker {
    pub kind: String,
    pub params: Mapping,
}

impl Component for Marker {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory that records every mapping it is offered, in call order.
#[derive(Default)]
pub struct RecordingFactory {
    known: HashSet<String>,
    failures: HashMap<String, ConstructError>,
    calls: RefCell<Vec<Mapping>>,
}

impl RecordingFactory {
    pub fn new<I: IntoIterator<Item = &'static str>>(known: I) -> Self {
        Self {
            known: known.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Make construction of `kind` fail with `error`.
    pub fn failing(mut self, kind: &str, error: ConstructError) -> Self {
        self.failures.insert(kind.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<Mapping> {
        self.calls.borrow().clone()
    }

    /// Discriminator values of every offered mapping, `None` when absent.
    pub fn offered_kinds(&self) -> Vec<Option<String>> {
        self.calls
            .borrow()
            .iter()
            .map(|mapping| mapping.get("class").and_then(Node::as_str).map(str::to_string))
            .collect()
    }
}

impl Factory for RecordingFactory {
    fn construct(&self, mapping: &Mapping) -> Result<Arc<dyn Component>, ConstructError> {
        self.calls.borrow_mut().push(mapping.clone());

        let kind = mapping
            .get("class")
            .and_then(Node::as_str)
            .ok_or_else(|| ConstructError::unknown_kind("class", None))?;
        if let Some(error) = self.failures.get(kind) {
            return Err(error.clone());
        }
        if !self.known.contains(kind) {
            return Err(ConstructError::unknown_kind("class", Some(kind.to_string())));
        }

        let params = mapping
            .iter()
            .filter(|(key, _)| key.as_str() != "class")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Arc::new(Marker {
            kind: kind.to_string(),
            params,
        }))
    }
}

pub fn marker(node: &Node) -> &Marker {
    node.downcast_ref::<Marker>()
        .unwrap_or_else(|| panic!("expected a Marker object, got {node:?}"))
}
