//! Test: Failure Handling - the first failing step ends the run

use crate::helpers::*;
use scaffolder::core::{ExecutionStatus, StepOutcome};
use scaffolder::execution::SinkClose;

/// Test that a failing step stops the pipeline and nothing after it runs
#[tokio::test]
async fn test_failure_stops_pipeline() {
    let pipeline = shell_pipeline(&[
        ("Create Repo", "create"),
        ("Clone", "clone"),
        ("Change Directory", "cd"),
        ("Deploy", "deploy"),
    ]);
    let executor = MockExecutor::new().fail("clone", 128, "fatal: repository not found\n");

    let result = run_with_mock(pipeline, executor.clone()).await;

    assert_eq!(result.report.status, ExecutionStatus::Failed);
    assert_eq!(result.transcript.close, Some(SinkClose::AfterError));
    assert_eq!(executor.commands(), vec!["create", "clone"]);
    assert_eq!(result.notices(), vec!["Create Repo", "Clone"]);
    assert_eq!(
        result.transcript.chunks.last().map(String::as_str),
        Some("Error: Command failed: clone (exit code 128): fatal: repository not found\n")
    );
    assert_eq!(result.report.failed_step().map(|s| s.label.as_str()), Some("Clone"));
}

/// Failing at step k of N: k notices, k-1 outputs, exactly one error line, last
#[tokio::test]
async fn test_failure_at_each_position() {
    let commands = ["s0", "s1", "s2", "s3", "s4"];
    let steps: Vec<(&str, &str)> = commands.iter().map(|c| (*c, *c)).collect();

    for (k, failing) in commands.iter().enumerate() {
        let executor = MockExecutor::new().fail(failing, 1, "nope");

        let result = run_with_mock(shell_pipeline(&steps), executor.clone()).await;

        assert_eq!(result.notices().len(), k + 1, "failing at {}", failing);
        assert_eq!(result.outputs().len(), k);
        assert_eq!(result.errors().len(), 1);
        assert!(result.transcript.chunks.last().unwrap().starts_with("Error: "));
        assert_eq!(executor.call_count(), k + 1);
        assert_eq!(result.report.steps.len(), k + 1);
        assert_eq!(result.transcript.close, Some(SinkClose::AfterError));
    }
}

/// Multi-line stderr collapses to a single error line
#[tokio::test]
async fn test_error_message_is_one_line() {
    let executor = MockExecutor::new().fail("deploy", 2, "line one\n\n  line two  \n");

    let result = run_with_mock(shell_pipeline(&[("Deploy", "deploy")]), executor).await;

    let error = &result.errors()[0];
    assert_eq!(error, "Error: Command failed: deploy (exit code 2): line one line two\n");
    assert_eq!(error.matches('\n').count(), 1);
    match &result.report.steps[0].outcome {
        StepOutcome::Failed { error } => assert!(!error.contains('\n')),
        other => panic!("expected failure, got {:?}", other),
    }
}

/// A failure in the first step still produces its notice
#[tokio::test]
async fn test_first_step_failure() {
    let executor = MockExecutor::new().fail("create", 1, "gh: not logged in");

    let result = run_with_mock(
        shell_pipeline(&[("Create Repo", "create"), ("Clone", "clone")]),
        executor,
    )
    .await;

    assert_eq!(
        result.text(),
        "Executing: Create Repo\nError: Command failed: create (exit code 1): gh: not logged in\n"
    );
    assert_eq!(result.report.completed_steps(), 0);
}
