//! `Command`: run an external program and wait for it.

use crate::registry::{Component, ConstructError, InvokeError, Params};
use std::any::Any;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn build(mut params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        let program = params.required_str("program")?;
        let args = params.optional_string_list("args")?;
        params.finish()?;

        if program.trim().is_empty() {
            return Err(ConstructError::construction("Command", "program must not be empty"));
        }
        Ok(Arc::new(Command { program, args }))
    }
}

impl Component for Command {
    fn kind(&self) -> &str {
        "Command"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        info!(program = %self.program, args = ?self.args, "Running command");
        let status = process::Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| {
                InvokeError::failed(self.kind(), format!("failed to start {}: {e}", self.program))
            })?;

        debug!(program = %self.program, status = %status, "Command finished");
        if status.success() {
            Ok(())
        } else {
            Err(InvokeError::failed(
                self.kind(),
                format!("{} exited with {status}", self.program),
            ))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;
    use serde_json::json;

    fn build(value: serde_json::Value) -> Result<Arc<dyn Component>, ConstructError> {
        match Node::from(value) {
            Node::Mapping(mapping) => Command::build(Params::new("Command", mapping)),
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_program_is_construction_error() {
        assert!(matches!(
            build(json!({"program": "  "})),
            Err(ConstructError::Construction { .. })
        ));
    }

    #[test]
    fn test_args_must_be_strings() {
        assert!(matches!(
            build(json!({"program": "echo", "args": [{"a": 1}]})),
            Err(ConstructError::Parameter { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_checked() {
        assert!(build(json!({"program": "true"})).unwrap().invoke().is_ok());

        let err = build(json!({"program": "false"})).unwrap().invoke().unwrap_err();
        assert!(matches!(err, InvokeError::Failed { .. }));
    }

    #[test]
    fn test_missing_program_fails_invocation() {
        let command = build(json!({"program": "definitely-not-a-real-program-xyz"})).unwrap();
        assert!(matches!(command.invoke(), Err(InvokeError::Failed { .. })));
    }
}
