//! # Registry Error Types
//!
//! Construction failures split into the three kinds the resolver recovers from
//! and everything else, which aborts resolution.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    /// Parameters do not fit the component: missing, mistyped or unexpected.
    #[error("Parameter mismatch for {kind}: {message}")]
    Parameter { kind: String, message: String },

    /// No builder is registered for the discriminator, or there is none.
    #[error("No component registered for {key}={}", .kind.as_deref().unwrap_or("<missing>"))]
    UnknownKind { key: String, kind: Option<String> },

    /// The builder matched but failed while instantiating.
    #[error("Construction of {kind} failed: {message}")]
    Construction { kind: String, message: String },

    /// Registry fault outside the construction contract.
    #[error("Internal registry error for {kind}: {message}")]
    Internal { kind: String, message: String },
}

impl ConstructError {
    pub fn parameter(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parameter {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn unknown_kind(key: impl Into<String>, kind: Option<String>) -> Self {
        Self::UnknownKind {
            key: key.into(),
            kind,
        }
    }

    pub fn construction(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn internal(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Whether the resolver may keep the node as plain data instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parameter { .. } | Self::UnknownKind { .. } | Self::Construction { .. }
        )
    }
}

/// Failures raised while invoking a constructed component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokeError {
    #[error("Component {kind} is not invokable")]
    NotInvokable { kind: String },

    #[error("Invocation of {kind} failed: {message}")]
    Failed { kind: String, message: String },
}

impl InvokeError {
    pub fn not_invokable(kind: impl Into<String>) -> Self {
        Self::NotInvokable { kind: kind.into() }
    }

    pub fn failed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
