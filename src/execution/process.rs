//! Subprocess execution for pipeline steps

use crate::error::StepError;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// A program and its argument vector, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    /// Wrap a script in `sh -c`
    pub fn shell(script: &str) -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }
}

/// Everything needed to run one step's process
#[derive(Clone)]
pub struct ExecRequest {
    pub spec: ProcessSpec,

    /// Rendered command line, used in error messages and logs
    pub command: String,

    /// Working directory for the child
    pub cwd: PathBuf,

    /// Extra environment for the child only (may contain secrets)
    pub env: Vec<(String, String)>,
}

impl fmt::Debug for ExecRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_names: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ExecRequest")
            .field("spec", &self.spec)
            .field("command", &self.command)
            .field("cwd", &self.cwd)
            .field("env", &env_names)
            .finish()
    }
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for command execution - allows for different implementations
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the process to completion and capture its output
    ///
    /// A non-zero exit status is an error.
    async fn execute(&self, request: &ExecRequest) -> Result<CommandOutput, StepError>;
}

/// Executor that spawns real child processes with tokio
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor;

impl SubprocessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn execute(&self, request: &ExecRequest) -> Result<CommandOutput, StepError> {
        debug!("Spawning `{}` in {}", request.command, request.cwd.display());

        // kill_on_drop: a timed-out or cancelled step must not leave the child running
        let output = Command::new(&request.spec.program)
            .args(&request.spec.args)
            .current_dir(&request.cwd)
            .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| StepError::Spawn {
                program: request.spec.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(
                "`{}` exited with {:?}: {}",
                request.command,
                output.status.code(),
                stderr.trim()
            );
            return Err(StepError::NonZeroExit {
                command: request.command.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!(
            "`{}` returned {} bytes of stdout, {} bytes of stderr",
            request.command,
            stdout.len(),
            stderr.len()
        );

        Ok(CommandOutput { stdout, stderr })
    }
}
