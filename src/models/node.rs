//! # Tree Nodes
//!
//! The in-memory tree the resolver rewrites. Raw documents decode into data
//! nodes only; [`Node::Object`] appears once a mapping has been constructed
//! into a live component.

use crate::registry::Component;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// String-keyed node mapping. Ordered so resolution visits keys deterministically.
pub type Mapping = BTreeMap<String, Node>;

#[derive(Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    Object(Arc<dyn Component>),
}

impl Node {
    /// Short name of the node variant, for diagnostics and error messages.
    pub fn kind_name(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Bool(_) => "bool".to_string(),
            Node::Number(_) => "number".to_string(),
            Node::String(_) => "string".to_string(),
            Node::Sequence(_) => "sequence".to_string(),
            Node::Mapping(_) => "mapping".to_string(),
            Node::Object(component) => format!("object<{}>", component.kind()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Node::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Component>> {
        match self {
            Node::Object(component) => Some(component),
            _ => None,
        }
    }

    /// Downcast an object node to a concrete component type.
    pub fn downcast_ref<T: Component + 'static>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|component| component.as_any().downcast_ref::<T>())
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<Arc<dyn Component>> for Node {
    fn from(component: Arc<dyn Component>) -> Self {
        Node::Object(component)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => a == b,
            // Constructed objects carry no structural identity.
            (Node::Object(a), Node::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => write!(f, "null"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Number(n) => write!(f, "{n}"),
            Node::String(s) => write!(f, "{s:?}"),
            Node::Sequence(items) => f.debug_list().entries(items).finish(),
            Node::Mapping(mapping) => f.debug_map().entries(mapping).finish(),
            Node::Object(component) => write!(f, "<{} {:?}>", component.kind(), component),
        }
    }
}
