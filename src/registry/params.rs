//! # Builder Parameters
//!
//! [`Params`] hands a builder the resolved, non-discriminator entries of an
//! object node. Extractors remove what they read, so [`Params::finish`] can
//! reject parameters the builder never asked for.

use super::component::Component;
use super::errors::ConstructError;
use crate::models::{Mapping, Node};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Params {
    kind: String,
    values: Mapping,
}

impl Params {
    pub fn new(kind: impl Into<String>, values: Mapping) -> Self {
        Self {
            kind: kind.into(),
            values,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove a parameter. Explicit `null` counts as absent.
    pub fn take(&mut self, name: &str) -> Option<Node> {
        self.values.remove(name).filter(|node| !node.is_null())
    }

    pub fn required(&mut self, name: &str) -> Result<Node, ConstructError> {
        self.take(name)
            .ok_or_else(|| ConstructError::parameter(&self.kind, format!("missing parameter `{name}`")))
    }

    pub fn required_str(&mut self, name: &str) -> Result<String, ConstructError> {
        let node = self.required(name)?;
        self.expect_string(name, node)
    }

    pub fn optional_str(&mut self, name: &str) -> Result<Option<String>, ConstructError> {
        self.take(name)
            .map(|node| self.expect_string(name, node))
            .transpose()
    }

    pub fn required_u64(&mut self, name: &str) -> Result<u64, ConstructError> {
        let node = self.required(name)?;
        node.as_u64()
            .ok_or_else(|| self.mismatch(name, "a non-negative integer", &node))
    }

    pub fn optional_u64(&mut self, name: &str) -> Result<Option<u64>, ConstructError> {
        match self.take(name) {
            None => Ok(None),
            Some(node) => node
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.mismatch(name, "a non-negative integer", &node)),
        }
    }

    pub fn required_f64(&mut self, name: &str) -> Result<f64, ConstructError> {
        let node = self.required(name)?;
        node.as_f64()
            .ok_or_else(|| self.mismatch(name, "a number", &node))
    }

    pub fn optional_f64(&mut self, name: &str) -> Result<Option<f64>, ConstructError> {
        match self.take(name) {
            None => Ok(None),
            Some(node) => node
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.mismatch(name, "a number", &node)),
        }
    }

    pub fn required_sequence(&mut self, name: &str) -> Result<Vec<Node>, ConstructError> {
        match self.required(name)? {
            Node::Sequence(items) => Ok(items),
            other => Err(self.mismatch(name, "a sequence", &other)),
        }
    }

    /// A parameter that must already have been constructed into a component.
    pub fn required_component(&mut self, name: &str) -> Result<Arc<dyn Component>, ConstructError> {
        match self.required(name)? {
            Node::Object(component) => Ok(component),
            other => Err(self.mismatch(name, "a component", &other)),
        }
    }

    pub fn optional_string_list(&mut self, name: &str) -> Result<Vec<String>, ConstructError> {
        let Some(node) = self.take(name) else {
            return Ok(Vec::new());
        };
        let Node::Sequence(items) = node else {
            return Err(self.mismatch(name, "a sequence of strings", &node));
        };
        items
            .into_iter()
            .map(|item| match item {
                Node::String(s) => Ok(s),
                Node::Number(n) => Ok(n.to_string()),
                other => Err(self.mismatch(name, "a sequence of strings", &other)),
            })
            .collect()
    }

    /// Reject any parameter the builder did not consume.
    pub fn finish(self) -> Result<(), ConstructError> {
        if self.values.is_empty() {
            return Ok(());
        }
        let unexpected: Vec<&str> = self.values.keys().map(String::as_str).collect();
        Err(ConstructError::parameter(
            &self.kind,
            format!("unexpected parameters: {}", unexpected.join(", ")),
        ))
    }

    fn expect_string(&self, name: &str, node: Node) -> Result<String, ConstructError> {
        match node {
            Node::String(s) => Ok(s),
            other => Err(self.mismatch(name, "a string", &other)),
        }
    }

    fn mismatch(&self, name: &str, expected: &str, found: &Node) -> ConstructError {
        ConstructError::parameter(
            &self.kind,
            format!("parameter `{name}` must be {expected}, found {}", found.kind_name()),
        )
    }
}
