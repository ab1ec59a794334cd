//! Pipeline execution

pub mod command;
pub mod engine;
pub mod executor;
pub mod trace;

pub use command::{CommandError, CommandOutput, CommandRunner, ShellCommandRunner};
pub use engine::{EventHandler, ExecutionEvent, PipelineDriver, RunOutcome};
pub use executor::StageExecutor;
pub use trace::{RunTrace, TraceEntry, TraceLevel};
