//! Run Log Tests
//!
//! A failing run still writes its startup lines and the failure to the run
//! log. Kept in its own test binary so this run installs the global
//! subscriber.

use runner_core::models::LogLevel;
use runner_core::runner::{run, RunOptions};
use runner_core::RunnerError;
use serde_json::json;

#[test]
fn failed_run_is_logged_at_error_level() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.json");
    let log_path = dir.path().join("broken.log");
    std::fs::write(
        &input,
        serde_json::to_string(&json!({
            "data": {
                "class": "Pipeline",
                "steps": [
                    {"class": "Log", "message": "checkpoint before failure"},
                    {"not": "a component"}
                ]
            }
        }))
        .unwrap(),
    )
    .unwrap();

    let err = run(&RunOptions {
        input_path: input,
        log_path: Some(log_path.clone()),
        log_level: Some(LogLevel::Info),
        config_path: None,
    })
    .unwrap_err();
    assert!(matches!(err, RunnerError::Invoke(_)));

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("Logging initialized"), "{contents}");
    assert!(contents.contains("Run environment"), "{contents}");
    assert!(contents.contains("checkpoint before failure"), "{contents}");

    let failure = contents
        .lines()
        .find(|line| line.contains("Run failed"))
        .unwrap_or_else(|| panic!("no failure entry in:\n{contents}"));
    assert!(failure.contains("ERROR"), "{failure}");
    assert!(failure.contains("step 1"), "{failure}");
}
