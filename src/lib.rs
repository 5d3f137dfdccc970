#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! # Runner Core
//!
//! Declarative object-graph instantiation: a structured-data tree goes in, a
//! wired component graph comes out, and its root is invoked.
//!
//! ## Overview
//!
//! Documents carry a `metadata` mapping and a `data` payload. The payload is
//! resolved bottom-up: mappings whose discriminator (`class` by default) names
//! a registered kind become live components, everything else stays data, and
//! strings like `"/steps.json"` splice in the `data` of another document.
//!
//! ## Module Organization
//!
//! - [`models`] - Tree nodes and documents
//! - [`registry`] - Component capability, construction contract and registry
//! - [`resolver`] - Bottom-up tree resolution and reference loading
//! - [`components`] - Built-in component kinds
//! - [`config`] - Layered runner configuration
//! - [`logging`] - Run log setup
//! - [`runner`] - Program flow from input file to invocation
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use runner_core::components::builtin_registry;
//! use runner_core::models::Node;
//! use runner_core::resolver::{MemoryReferenceLoader, Resolver};
//! use serde_json::json;
//!
//! let registry = builtin_registry();
//! let loader = MemoryReferenceLoader::new()
//!     .with_document("steps.json", json!({"data": [{"class": "Noop"}]}));
//! let resolver = Resolver::new(&registry, &loader);
//!
//! let root = resolver
//!     .resolve(Node::from(json!({"class": "Pipeline", "steps": ["/steps.json"]})))
//!     .unwrap();
//! root.as_object().unwrap().invoke().unwrap();
//! ```

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod runner;

pub use config::{ResolverConfig, RunnerConfig};
pub use error::{Result, RunnerError};
pub use models::{Document, Mapping, Node};
pub use registry::{Component, ComponentRegistry, ConstructError, Factory, InvokeError, Params};
pub use resolver::{FsReferenceLoader, MemoryReferenceLoader, ReferenceLoader, Resolver};
pub use runner::{run, RunOptions, Runner};
