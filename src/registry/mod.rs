//! # Component Registry
//!
//! Construction side of resolution: the [`Component`] capability every built
//! object exposes, the [`Factory`] contract the resolver calls, and the
//! tag-to-builder [`ComponentRegistry`] that implements it.
//!
//! ```text
//! Registry
//! ├── Component          (constructed object, optionally invokable)
//! ├── Factory            (construct(&Mapping) -> component | ConstructError)
//! ├── ComponentRegistry  (discriminator tag -> builder closure)
//! └── Params             (typed access to resolved parameters)
//! ```

pub mod component;
pub mod component_registry;
pub mod errors;
pub mod params;

pub use component::Component;
pub use component_registry::{ComponentBuilder, ComponentRegistry, Factory};
pub use errors::{ConstructError, InvokeError};
pub use params::Params;
