//! # Built-in Components
//!
//! Kinds available to every run without custom registration. Hosts embedding
//! the runner add their own kinds to the same [`ComponentRegistry`].

pub mod basic;
pub mod command;
pub mod pipeline;

pub use basic::{Log, Noop, Sleep};
pub use command::Command;
pub use pipeline::{Pipeline, Repeat};

use crate::registry::ComponentRegistry;

/// Register every built-in kind under its type name.
pub fn register_builtin_components(registry: &mut ComponentRegistry) {
    registry
        .register("Noop", Noop::build)
        .register("Log", Log::build)
        .register("Sleep", Sleep::build)
        .register("Command", Command::build)
        .register("Pipeline", Pipeline::build)
        .register("Repeat", Repeat::build);
}

/// Registry preloaded with the built-in kinds.
pub fn builtin_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    register_builtin_components(&mut registry);
    registry
}
