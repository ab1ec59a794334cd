//! Submission, lookup and log retrieval over a project store

use crate::core::PipelineState;
use crate::document::{extract_text, DocumentError};
use crate::execution::{CommandRunner, PipelineDriver, RunOutcome, RunTrace};
use crate::llm::CompletionClient;
use crate::persistence::{ProjectRecord, ProjectStore};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Project {0} not found")]
    NotFound(i64),

    #[error("Project {0} has no recorded run")]
    NoRun(i64),

    #[error("Run trace for project {0} not found")]
    TraceNotFound(i64),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Storage error: {0}")]
    Store(#[from] anyhow::Error),
}

/// What to run the pipeline over
#[derive(Debug, Clone)]
pub enum SubmitInput {
    /// A new document and screenshot
    Fresh {
        document: PathBuf,
        screenshot_ref: String,
    },
    /// A state saved by an earlier run
    Resume(PipelineState),
}

/// A stored project together with the run that produced it
#[derive(Debug, Clone)]
pub struct Submission {
    pub project: ProjectRecord,
    pub outcome: RunOutcome,
}

pub struct ProjectService {
    store: Box<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(store: impl ProjectStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Create the record, run the pipeline, then store the trace and the
    /// outcome on the record
    pub async fn submit<C: CompletionClient, R: CommandRunner>(
        &self,
        driver: &PipelineDriver<C, R>,
        input: SubmitInput,
    ) -> Result<Submission, ServiceError> {
        let state = match input {
            SubmitInput::Fresh {
                document,
                screenshot_ref,
            } => {
                let text = extract_text(&document).await?;
                PipelineState::new(screenshot_ref, text)
            }
            SubmitInput::Resume(state) => state,
        };

        let project = self
            .store
            .create_project(&state.document_text, &state.screenshot_url)
            .await?;
        info!("Created project {}", project.id);

        let outcome = driver.run(state).await;

        self.store.save_trace(&outcome.trace).await?;
        let project = self
            .store
            .complete_project(
                project.id,
                outcome.state.preview_link.as_deref(),
                outcome.trace.run_id,
            )
            .await?;
        info!(
            "Project {} finished with status {:?}",
            project.id, outcome.status
        );

        Ok(Submission { project, outcome })
    }

    pub async fn get(&self, id: i64) -> Result<ProjectRecord, ServiceError> {
        self.store
            .get_project(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<ProjectRecord>, ServiceError> {
        Ok(self.store.list_projects().await?)
    }

    /// The trace of the run recorded on a project
    pub async fn logs(&self, id: i64) -> Result<RunTrace, ServiceError> {
        let project = self.get(id).await?;
        let run_id = project.run_id.ok_or(ServiceError::NoRun(id))?;
        self.store
            .load_trace(run_id)
            .await?
            .ok_or(ServiceError::TraceNotFound(id))
    }
}
