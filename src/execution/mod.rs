//! Pipeline execution: subprocesses, output sinks and the runner

pub mod cancel;
pub mod credentials;
pub mod process;
pub mod runner;
pub mod sink;

pub use cancel::CancellationHandle;
pub use credentials::Credentials;
pub use process::{CommandExecutor, CommandOutput, ExecRequest, ProcessSpec, SubprocessExecutor};
pub use runner::{EventHandler, PipelineRunner, RunEvent, RunOptions};
pub use sink::{channel, ChannelSink, MemorySink, OutputSink, OutputStream, SinkClose, SinkMessage, Transcript};
