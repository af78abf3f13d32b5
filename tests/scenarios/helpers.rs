//! Test utility functions for scaffolder scenarios

use async_trait::async_trait;
use scaffolder::core::{CommandStep, Invocation, Pipeline, RunReport};
use scaffolder::error::StepError;
use scaffolder::execution::{
    channel, CommandExecutor, CommandOutput, Credentials, ExecRequest, PipelineRunner, RunOptions,
    Transcript,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted response for one command
#[derive(Debug, Clone)]
pub enum Scripted {
    Output { stdout: String, stderr: String },
    Exit { code: i32, stderr: String },
}

/// Mock executor that answers by command text and records every call
///
/// Commands without a script succeed with stdout `ran <command>`.
#[derive(Clone, Default)]
pub struct MockExecutor {
    scripts: Arc<HashMap<String, Scripted>>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<ExecRequest>>>,
    delays: Arc<HashMap<String, Duration>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` print `stdout`/`stderr` and succeed
    pub fn succeed(mut self, command: &str, stdout: &str, stderr: &str) -> Self {
        Arc::make_mut(&mut self.scripts).insert(
            command.to_string(),
            Scripted::Output {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make `command` exit with `code`
    pub fn fail(mut self, command: &str, code: i32, stderr: &str) -> Self {
        Arc::make_mut(&mut self.scripts).insert(
            command.to_string(),
            Scripted::Exit {
                code,
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make `command` take `delay` before answering
    pub fn with_delay(mut self, command: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.delays).insert(command.to_string(), delay);
        self
    }

    /// Number of commands dispatched so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests in dispatch order
    pub fn requests(&self) -> Vec<ExecRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Commands in dispatch order
    pub fn commands(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.command).collect()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, request: &ExecRequest) -> Result<CommandOutput, StepError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delays.get(&request.command) {
            tokio::time::sleep(*delay).await;
        }

        match self.scripts.get(&request.command) {
            Some(Scripted::Output { stdout, stderr }) => Ok(CommandOutput::new(stdout.clone(), stderr.clone())),
            Some(Scripted::Exit { code, stderr }) => Err(StepError::NonZeroExit {
                command: request.command.clone(),
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            None => Ok(CommandOutput::new(format!("ran {}", request.command), "")),
        }
    }
}

/// Build a pipeline of shell steps from `(label, command)` pairs
pub fn shell_pipeline(steps: &[(&str, &str)]) -> Pipeline {
    Pipeline::new(
        "test",
        steps
            .iter()
            .map(|(label, command)| CommandStep::new(*label, Invocation::shell(*command)))
            .collect(),
    )
}

/// Result of running a pipeline through a channel sink
#[derive(Debug, Clone)]
pub struct RunResult {
    pub report: RunReport,
    pub transcript: Transcript,
}

impl RunResult {
    pub fn text(&self) -> String {
        self.transcript.text()
    }

    /// Labels announced by `Executing:` notices, in order
    pub fn notices(&self) -> Vec<String> {
        self.transcript
            .chunks
            .iter()
            .filter_map(|c| c.strip_prefix("Executing: "))
            .map(|c| c.trim_end_matches('\n').to_string())
            .collect()
    }

    /// Chunks that are neither notices nor error lines
    pub fn outputs(&self) -> Vec<String> {
        self.transcript
            .chunks
            .iter()
            .filter(|c| !c.starts_with("Executing: ") && !c.starts_with("Error: "))
            .cloned()
            .collect()
    }

    /// Chunks that are error lines
    pub fn errors(&self) -> Vec<String> {
        self.transcript
            .chunks
            .iter()
            .filter(|c| c.starts_with("Error: "))
            .cloned()
            .collect()
    }
}

/// Run a pipeline with the mock executor, draining the stream concurrently
pub async fn run_with_mock(pipeline: Pipeline, executor: MockExecutor) -> RunResult {
    run_with(pipeline, executor, Credentials::new(), RunOptions::default()).await
}

/// Run a pipeline with any executor, draining the stream concurrently
pub async fn run_with<E: CommandExecutor + 'static>(
    pipeline: Pipeline,
    executor: E,
    credentials: Credentials,
    options: RunOptions,
) -> RunResult {
    let (mut sink, stream) = channel(1);
    let runner = PipelineRunner::new(executor, credentials).with_options(options);
    let task = tokio::spawn(async move { runner.run(&pipeline, &mut sink).await });

    let transcript = stream.collect().await;
    let report = task.await.expect("runner task panicked");

    RunResult { report, transcript }
}

/// Byte offset of `needle` in `haystack`, panicking with context if absent
pub fn offset_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in:\n{}", needle, haystack))
}
