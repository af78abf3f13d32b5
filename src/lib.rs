//! scaffolder - create, clone and deploy a new project by streaming a fixed command pipeline

pub mod cli;
pub mod core;
pub mod error;
pub mod execution;

// Re-export commonly used types
pub use core::{build, CommandStep, Invocation, Pipeline, PipelineBuilder, RunReport, ScaffoldConfig};
pub use error::{ScaffoldError, StepError};
pub use execution::{
    channel, CancellationHandle, CommandExecutor, Credentials, MemorySink, OutputSink, PipelineRunner,
    RunOptions, SinkClose, SubprocessExecutor,
};
