//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Every step succeeded
    Completed,
    /// A step failed and the rest were skipped
    Failed,
}

/// Runner state machine: `Idle -> Running(i) -> {Completed | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running(usize),
    Completed,
    Failed,
}

impl RunnerState {
    /// Check if the run has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunnerState::Completed | RunnerState::Failed)
    }

    /// Advance after step `index` succeeded in a pipeline of `total` steps
    pub fn advance(self, total: usize) -> Self {
        match self {
            RunnerState::Idle if total == 0 => RunnerState::Completed,
            RunnerState::Idle => RunnerState::Running(0),
            RunnerState::Running(index) if index + 1 >= total => RunnerState::Completed,
            RunnerState::Running(index) => RunnerState::Running(index + 1),
            terminal => terminal,
        }
    }
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Step finished with exit status zero
    Succeeded { stdout: String, stderr: String },
    /// Step failed; carries the reported message
    Failed { error: String },
}

/// Record of one executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub label: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

impl StepRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, StepOutcome::Succeeded { .. })
    }
}

/// Summary of a finished run
///
/// Only lives in memory; nothing is persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run ID
    pub run_id: Uuid,

    /// Name of the pipeline that ran
    pub pipeline: String,

    pub status: ExecutionStatus,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Total number of steps in the pipeline
    pub total_steps: usize,

    /// Steps that were attempted, in order
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    /// Number of steps that succeeded
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_success()).count()
    }

    /// The failed step, if any
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| !s.is_success())
    }

    /// Calculate progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 1.0;
        }
        self.completed_steps() as f64 / self.total_steps as f64
    }
}
