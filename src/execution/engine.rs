//! Pipeline driver - runs the configured stages in order over one state

use crate::{
    core::{ExecutionStatus, GeneratorConfig, Pipeline, PipelineState, Stage, StageOutcome},
    execution::{CommandRunner, RunTrace, StageExecutor, TraceLevel},
    llm::CompletionClient,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        run_id: Uuid,
        pipeline_name: String,
        stage_count: usize,
    },
    StageStarted {
        stage: Stage,
        index: usize,
    },
    StageCompleted {
        stage: Stage,
        new_errors: usize,
        elapsed_ms: u64,
    },
    StageHalted {
        stage: Stage,
        reason: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Result of one driver run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: PipelineState,
    pub status: ExecutionStatus,
    pub trace: RunTrace,
}

/// Runs an ordered list of stages against a shared state.
///
/// Recorded errors never stop the run; a stage returning
/// [`StageOutcome::Halt`] does, and the state is returned as it stands.
pub struct PipelineDriver<C, R> {
    executor: StageExecutor<C, R>,
    event_handlers: Vec<EventHandler>,
}

impl<C: CompletionClient, R: CommandRunner> PipelineDriver<C, R> {
    /// Create a driver for the stages named in `config`
    pub fn new(client: C, runner: R, config: GeneratorConfig) -> anyhow::Result<Self> {
        let pipeline = Pipeline::from_config(&config)?;
        Ok(Self::with_pipeline(client, runner, config, pipeline))
    }

    /// Create a driver for an explicit stage list
    pub fn with_pipeline(client: C, runner: R, config: GeneratorConfig, pipeline: Pipeline) -> Self {
        Self {
            executor: StageExecutor::new(client, runner, config, pipeline),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        self.executor.pipeline()
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Run every stage once over `state`
    pub async fn run(&self, mut state: PipelineState) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let pipeline = self.executor.pipeline();
        let mut trace = RunTrace::start(run_id);

        state.iteration_count += 1;
        let errors_at_start = state.errors.len();

        info!(
            "Starting pipeline run: {} ({}, iteration {})",
            pipeline.name, run_id, state.iteration_count
        );
        trace.record(
            None,
            TraceLevel::Info,
            format!(
                "run started: {} stages, iteration {}",
                pipeline.stages.len(),
                state.iteration_count
            ),
        );
        self.emit_event(ExecutionEvent::PipelineStarted {
            run_id,
            pipeline_name: pipeline.name.clone(),
            stage_count: pipeline.stages.len(),
        });

        let mut halted = false;
        for (index, &stage) in pipeline.stages.iter().enumerate() {
            self.emit_event(ExecutionEvent::StageStarted { stage, index });
            trace.record(Some(stage), TraceLevel::Info, "started");

            let errors_before = state.errors.len();
            let started = Instant::now();
            let outcome = self.executor.execute(stage, &mut state).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let new_errors = state.errors.get(errors_before..).unwrap_or_default();
            for note in new_errors {
                trace.record(Some(stage), TraceLevel::Warn, note.clone());
            }
            let new_error_count = new_errors.len();

            match outcome {
                StageOutcome::Continue => {
                    if new_error_count > 0 {
                        warn!("Stage {} recorded {} errors", stage, new_error_count);
                    }
                    trace.record(
                        Some(stage),
                        TraceLevel::Info,
                        format!("completed in {} ms", elapsed_ms),
                    );
                    self.emit_event(ExecutionEvent::StageCompleted {
                        stage,
                        new_errors: new_error_count,
                        elapsed_ms,
                    });
                }
                StageOutcome::Halt { reason } => {
                    error!("Stage {} halted the pipeline: {}", stage, reason);
                    trace.record(Some(stage), TraceLevel::Error, format!("halted: {}", reason));
                    self.emit_event(ExecutionEvent::StageHalted { stage, reason });
                    halted = true;
                    break;
                }
            }
        }

        let status = if halted {
            ExecutionStatus::Halted
        } else if state.errors.len() > errors_at_start {
            ExecutionStatus::CompletedWithErrors
        } else {
            ExecutionStatus::Completed
        };

        trace.record(None, TraceLevel::Info, format!("run finished: {:?}", status));
        trace.finish(status);
        info!("Pipeline run finished: {} - {:?}", pipeline.name, status);
        self.emit_event(ExecutionEvent::PipelineCompleted { run_id, status });

        RunOutcome {
            state,
            status,
            trace,
        }
    }
}
