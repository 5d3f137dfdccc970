//! # Data Models
//!
//! The tree the resolver walks and the documents it is loaded from.

pub mod document;
pub mod node;

pub use document::{Document, DocumentFormat, LogLevel, Metadata};
pub use node::{Mapping, Node};
