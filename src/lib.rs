//! frontgen - generates scaffolded front-end projects from a requirements
//! document and a UI screenshot using an LLM

pub mod cli;
pub mod core;
pub mod document;
pub mod execution;
pub mod llm;
pub mod parsing;
pub mod persistence;
pub mod prompts;
pub mod service;
pub mod stages;

// Re-export commonly used types
pub use core::{ExecutionStatus, GeneratorConfig, Pipeline, PipelineState, Stage, StageOutcome};
pub use execution::{CommandRunner, ExecutionEvent, PipelineDriver, RunOutcome, ShellCommandRunner};
pub use llm::{CompletionClient, CompletionClientConfig, CompletionRequest, OpenAiCompatibleClient};
pub use parsing::{detect_dependencies, parse_component_code, ParseError};
pub use service::{ProjectService, SubmitInput};
