//! Pipeline runner - executes steps in order and streams their output

use crate::{
    core::{
        CommandStep, ExecutionStatus, Invocation, Pipeline, RunReport, RunnerState, StepOutcome,
        StepRecord,
    },
    error::StepError,
    execution::{
        CancellationHandle, CommandExecutor, CommandOutput, Credentials, ExecRequest, OutputSink,
        ProcessSpec, SinkClose,
    },
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events emitted while a pipeline runs
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    StepStarted {
        index: usize,
        total: usize,
        label: String,
    },
    StepSucceeded {
        index: usize,
        label: String,
        duration: Duration,
    },
    StepFailed {
        index: usize,
        label: String,
        error: String,
    },
    RunFinished {
        run_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Knobs for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the first step runs in
    pub working_dir: PathBuf,

    /// Per-step time limit; `None` waits forever
    pub step_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            step_timeout: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }
}

/// Runs one pipeline, strictly one step at a time, failing fast
///
/// For every step the sink receives `Executing: <label>\n`, then either the
/// captured `<stdout>\n<stderr>\n` as one chunk, or a single
/// `Error: <message>\n` line after which the sink is closed and no further
/// step runs. A runner is consumed by [`PipelineRunner::run`].
pub struct PipelineRunner<E> {
    executor: E,
    credentials: Credentials,
    options: RunOptions,
    cancel: CancellationHandle,
    event_handlers: Vec<EventHandler>,
    state: RunnerState,
}

impl<E: CommandExecutor> PipelineRunner<E> {
    pub fn new(executor: E, credentials: Credentials) -> Self {
        Self {
            executor,
            credentials,
            options: RunOptions::default(),
            cancel: CancellationHandle::new(),
            event_handlers: Vec::new(),
            state: RunnerState::Idle,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Use an externally owned cancellation handle
    pub fn with_cancellation(mut self, cancel: CancellationHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Add an event handler
    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
        self
    }

    /// Handle that cancels this runner's current step
    pub fn cancellation_handle(&self) -> CancellationHandle {
        self.cancel.clone()
    }

    fn emit(&self, event: RunEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the entire pipeline against `sink`
    pub async fn run(mut self, pipeline: &Pipeline, sink: &mut dyn OutputSink) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = pipeline.len();
        let mut cwd = self.options.working_dir.clone();
        let mut records = Vec::with_capacity(total);

        info!("Starting pipeline {} ({}) with {} steps", pipeline.name(), run_id, total);

        self.state = self.state.advance(total);
        while let RunnerState::Running(index) = self.state {
            let step = &pipeline.steps()[index];

            info!("Executing step {}/{}: {}", index + 1, total, step.label());
            self.emit(RunEvent::StepStarted {
                index,
                total,
                label: step.label().to_string(),
            });
            sink.write(format!("Executing: {}\n", step.label())).await;

            let clock = Instant::now();
            let result = self.execute_step(step, &mut cwd).await;
            let duration = clock.elapsed();

            match result {
                Ok(output) => {
                    sink.write(format!("{}\n{}\n", output.stdout, output.stderr))
                        .await;
                    self.emit(RunEvent::StepSucceeded {
                        index,
                        label: step.label().to_string(),
                        duration,
                    });
                    records.push(StepRecord {
                        label: step.label().to_string(),
                        outcome: StepOutcome::Succeeded {
                            stdout: output.stdout,
                            stderr: output.stderr,
                        },
                        duration,
                    });
                    self.state = self.state.advance(total);
                }
                Err(err) => {
                    let message = err.single_line();
                    warn!("Step {} failed: {}", step.label(), message);
                    sink.write(format!("Error: {}\n", message)).await;
                    self.emit(RunEvent::StepFailed {
                        index,
                        label: step.label().to_string(),
                        error: message.clone(),
                    });
                    records.push(StepRecord {
                        label: step.label().to_string(),
                        outcome: StepOutcome::Failed { error: message },
                        duration,
                    });
                    self.state = RunnerState::Failed;
                }
            }
        }

        let (status, close) = match self.state {
            RunnerState::Failed => (ExecutionStatus::Failed, SinkClose::AfterError),
            _ => (ExecutionStatus::Completed, SinkClose::Normal),
        };
        sink.close(close).await;

        info!("Pipeline {} finished: {:?}", pipeline.name(), status);
        self.emit(RunEvent::RunFinished { run_id, status });

        RunReport {
            run_id,
            pipeline: pipeline.name().to_string(),
            status,
            started_at,
            finished_at: Utc::now(),
            total_steps: total,
            steps: records,
        }
    }

    /// Execute a single step, honouring timeout and cancellation
    async fn execute_step(
        &self,
        step: &CommandStep,
        cwd: &mut PathBuf,
    ) -> Result<CommandOutput, StepError> {
        if self.cancel.is_cancelled() {
            return Err(StepError::Cancelled);
        }

        let spec = match step.invocation() {
            Invocation::ChangeDirectory { path } => return change_directory(cwd, path).await,
            Invocation::Program { program, args } => ProcessSpec {
                program: program.clone(),
                args: args.clone(),
            },
            Invocation::Shell { script } => ProcessSpec::shell(script),
        };

        // A missing cwd would otherwise surface as a spawn failure of the program
        ensure_directory(cwd).await?;

        let request = ExecRequest {
            spec,
            command: step.command().to_string(),
            cwd: cwd.clone(),
            env: self.credentials.resolve(step.env())?,
        };
        debug!("Dispatching {:?}", request);

        let execution = async {
            match self.options.step_timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.executor.execute(&request)).await {
                        Ok(result) => result,
                        Err(_) => Err(StepError::Timeout(limit)),
                    }
                }
                None => self.executor.execute(&request).await,
            }
        };

        tokio::select! {
            result = execution => result,
            _ = self.cancel.cancelled() => Err(StepError::Cancelled),
        }
    }
}

/// Move the run into `path` (relative to the current directory)
async fn change_directory(cwd: &mut PathBuf, path: &str) -> Result<CommandOutput, StepError> {
    let target = resolve_dir(cwd, path);
    ensure_directory(&target).await?;

    debug!("Working directory is now {}", target.display());
    *cwd = target;
    Ok(CommandOutput::default())
}

async fn ensure_directory(path: &Path) -> Result<(), StepError> {
    let is_dir = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if is_dir {
        Ok(())
    } else {
        Err(StepError::MissingDirectory(path.to_path_buf()))
    }
}

fn resolve_dir(cwd: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
