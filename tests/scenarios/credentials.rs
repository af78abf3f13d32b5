//! Test: Credentials - secrets reach only the steps that bind them

use crate::helpers::*;
use scaffolder::core::{build, EnvBinding, Invocation, Pipeline, CommandStep};
use scaffolder::execution::{Credentials, RunOptions};

fn credentials() -> Credentials {
    Credentials::new()
        .with("GITHUB_TOKEN", "ghp_secret")
        .with("FLY_API_TOKEN", "fly_secret")
}

#[tokio::test]
async fn test_bound_credentials_are_passed() {
    let pipeline = Pipeline::new(
        "test",
        vec![
            CommandStep::new("Plain", Invocation::program("echo", ["hi"])),
            CommandStep::new("Deploy", Invocation::program("fly", ["deploy"]))
                .with_env(EnvBinding::new("FLY_API_TOKEN", "FLY_API_TOKEN")),
        ],
    );
    let executor = MockExecutor::new();

    let result = run_with(pipeline, executor.clone(), credentials(), RunOptions::new()).await;

    assert!(result.report.is_success());
    let requests = executor.requests();
    assert!(requests[0].env.is_empty());
    assert_eq!(
        requests[1].env,
        vec![("FLY_API_TOKEN".to_string(), "fly_secret".to_string())]
    );
}

/// Secrets never show up in the stream or in request debug output
#[tokio::test]
async fn test_secrets_not_echoed() {
    let pipeline = build("demo1", "iad").unwrap();
    let executor = MockExecutor::new();
    let workspace = tempfile::tempdir().unwrap();
    std::fs::create_dir(workspace.path().join("demo1")).unwrap();

    let result = run_with(
        pipeline,
        executor.clone(),
        credentials(),
        RunOptions::new().with_working_dir(workspace.path()),
    )
    .await;

    assert!(result.report.is_success(), "{}", result.text());
    for request in executor.requests() {
        let debug = format!("{:?}", request);
        assert!(!debug.contains("ghp_secret"), "{}", debug);
        assert!(!debug.contains("fly_secret"), "{}", debug);
    }
    assert!(!result.text().contains("ghp_secret"));
    assert!(!result.text().contains("fly_secret"));
    assert!(!format!("{:?}", credentials()).contains("secret"));
}

/// The reference pipeline runs in order and binds tokens only to gh and fly
#[tokio::test]
async fn test_reference_pipeline_dispatch() {
    let pipeline = build("demo1", "iad").unwrap();
    let executor = MockExecutor::new();
    let workspace = tempfile::tempdir().unwrap();
    std::fs::create_dir(workspace.path().join("demo1")).unwrap();

    let result = run_with(
        pipeline.clone(),
        executor.clone(),
        credentials(),
        RunOptions::new().with_working_dir(workspace.path()),
    )
    .await;

    assert_eq!(result.notices(), pipeline.labels());
    // The directory change runs in-process, every other step is dispatched
    assert_eq!(executor.call_count(), pipeline.len() - 1);

    let requests = executor.requests();
    let project_dir = workspace.path().join("demo1");
    assert_eq!(requests[0].cwd, workspace.path());
    assert_eq!(requests[1].cwd, workspace.path());
    for request in &requests[2..] {
        assert_eq!(request.cwd, project_dir);
    }

    let with_env: Vec<&str> = requests
        .iter()
        .filter(|r| !r.env.is_empty())
        .map(|r| r.spec.program.as_str())
        .collect();
    assert!(with_env.iter().all(|p| *p == "gh" || *p == "fly"), "{:?}", with_env);
}

/// An unset credential fails the step that needs it before anything spawns
#[tokio::test]
async fn test_missing_credential_stops_run() {
    let pipeline = build("demo1", "iad").unwrap();
    let executor = MockExecutor::new();

    let result = run_with(pipeline, executor.clone(), Credentials::new(), RunOptions::new()).await;

    assert!(!result.report.is_success());
    assert_eq!(result.notices(), vec!["Create GitHub Repository"]);
    assert_eq!(
        result.errors(),
        vec!["Error: Missing credential GITHUB_TOKEN\n"]
    );
    assert_eq!(executor.call_count(), 0);
}
