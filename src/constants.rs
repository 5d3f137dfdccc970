//! Shared constants for documents and resolution.

/// Key that names the component kind inside an object node.
pub const DEFAULT_DISCRIMINATOR: &str = "class";

/// Leading text that marks a string as a candidate file reference.
pub const DEFAULT_REFERENCE_SENTINEL: &str = "/";

/// Extensions a reference target must carry to be expanded.
pub const DEFAULT_REFERENCE_EXTENSIONS: &[&str] = &["json"];

pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 64;

/// Top-level document fields.
pub mod fields {
    pub const DATA: &str = "data";
    pub const METADATA: &str = "metadata";
}

/// Environment variable prefix for runner configuration overrides.
pub const CONFIG_ENV_PREFIX: &str = "RUNNER";
