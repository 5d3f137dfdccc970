//! Composite components: `Pipeline` and `Repeat`.

use crate::models::Node;
use crate::registry::{Component, ConstructError, InvokeError, Params};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info};

/// Invokes its steps in order. Nested sequences run depth-first, so a step
/// list spliced in from a referenced document behaves like inline steps.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub name: Option<String>,
    pub steps: Vec<Node>,
}

impl Pipeline {
    pub fn build(mut params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        let steps = params.required_sequence("steps")?;
        let name = params.optional_str("name")?;
        params.finish()?;
        Ok(Arc::new(Pipeline { name, steps }))
    }

    /// Steps in execution order, with nested sequences flattened.
    pub fn flattened_steps(&self) -> Vec<&Node> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
            for node in nodes {
                match node {
                    Node::Sequence(inner) => collect(inner, out),
                    other => out.push(other),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.steps, &mut out);
        out
    }
}

impl Component for Pipeline {
    fn kind(&self) -> &str {
        "Pipeline"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        let steps = self.flattened_steps();
        let name = self.name.as_deref().unwrap_or("pipeline");
        info!(pipeline = name, steps = steps.len(), "Starting pipeline");

        for (index, step) in steps.iter().enumerate() {
            let Node::Object(component) = step else {
                return Err(InvokeError::failed(
                    self.kind(),
                    format!("step {index} is a {}, not a component", step.kind_name()),
                ));
            };
            debug!(pipeline = name, step = index, kind = component.kind(), "Running step");
            component.invoke()?;
        }

        info!(pipeline = name, "Pipeline finished");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Invokes `action` `times` times.
#[derive(Debug, Clone)]
pub struct Repeat {
    pub times: u64,
    pub action: Arc<dyn Component>,
}

impl Repeat {
    pub fn build(mut params: Params) -> Result<Arc<dyn Component>, ConstructError> {
        let times = params.required_u64("times")?;
        let action = params.required_component("action")?;
        params.finish()?;
        Ok(Arc::new(Repeat { times, action }))
    }
}

impl Component for Repeat {
    fn kind(&self) -> &str {
        "Repeat"
    }

    fn invoke(&self) -> Result<(), InvokeError> {
        for iteration in 0..self.times {
            debug!(iteration, kind = self.action.kind(), "Repeating action");
            self.action.invoke()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Noop;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    impl Component for Counter {
        fn kind(&self) -> &str {
            "Counter"
        }

        fn invoke(&self) -> Result<(), InvokeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_pipeline_runs_nested_steps_in_order() {
        let counter = Arc::new(Counter::default());
        let pipeline = Pipeline {
            name: None,
            steps: vec![
                Node::Sequence(vec![Node::Object(counter.clone())]),
                Node::Object(Arc::new(Noop)),
                Node::Object(counter.clone()),
            ],
        };

        assert_eq!(pipeline.flattened_steps().len(), 3);
        pipeline.invoke().unwrap();
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pipeline_rejects_data_steps() {
        let pipeline = Pipeline {
            name: Some("bad".into()),
            steps: vec![Node::Object(Arc::new(Noop)), Node::from(json!({"class": "Missing"}))],
        };

        let err = pipeline.invoke().unwrap_err();
        assert_eq!(
            err,
            InvokeError::failed("Pipeline", "step 1 is a mapping, not a component")
        );
    }

    #[test]
    fn test_repeat_invokes_action() {
        let counter = Arc::new(Counter::default());
        let repeat = Repeat {
            times: 3,
            action: counter.clone(),
        };

        repeat.invoke().unwrap();
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_repeat_requires_component_action() {
        let mapping = match Node::from(json!({"times": 2, "action": {"class": "Noop"}})) {
            Node::Mapping(mapping) => mapping,
            other => panic!("expected mapping, got {other:?}"),
        };
        assert!(matches!(
            Repeat::build(Params::new("Repeat", mapping)),
            Err(ConstructError::Parameter { .. })
        ));
    }
}
