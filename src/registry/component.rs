//! # Component Capability
//!
//! Every object the registry constructs implements [`Component`]. The resolved
//! root of a run must be invokable; inner components may be plain values that
//! only their parents know how to use.

use super::errors::InvokeError;
use std::any::Any;
use std::fmt::Debug;

pub trait Component: Debug + Send + Sync {
    /// Discriminator tag this component was constructed from.
    fn kind(&self) -> &str;

    /// Run the component with no arguments.
    fn invoke(&self) -> Result<(), InvokeError> {
        Err(InvokeError::not_invokable(self.kind()))
    }

    fn as_any(&self) -> &dyn Any;
}
