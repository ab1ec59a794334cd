//! Persistence layer for project records and run traces

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteProjectStore;

use crate::execution::RunTrace;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// One submission: its inputs and the outcome of its pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Store-assigned identifier
    pub id: i64,

    /// Extracted requirements-document text
    pub document_text: String,

    /// Screenshot path or URL as submitted
    pub screenshot_ref: String,

    /// Set once the run finishes
    pub preview_link: Option<String>,

    /// Identifier of the run whose trace is stored
    pub run_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trait for persistence backends
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new record and return it with its id
    async fn create_project(&self, document_text: &str, screenshot_ref: &str) -> Result<ProjectRecord>;

    /// Record the outcome of the run for a project
    async fn complete_project(
        &self,
        id: i64,
        preview_link: Option<&str>,
        run_id: Uuid,
    ) -> Result<ProjectRecord>;

    /// Load a project by id
    async fn get_project(&self, id: i64) -> Result<Option<ProjectRecord>>;

    /// List all projects, oldest first
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>>;

    /// Save (or replace) a run trace
    async fn save_trace(&self, trace: &RunTrace) -> Result<()>;

    /// Load a run trace by run id
    async fn load_trace(&self, run_id: Uuid) -> Result<Option<RunTrace>>;
}

/// In-memory persistence (for testing or `--no-store` runs)
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: tokio::sync::RwLock<BTreeMap<i64, ProjectRecord>>,
    traces: tokio::sync::RwLock<HashMap<Uuid, RunTrace>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create_project(&self, document_text: &str, screenshot_ref: &str) -> Result<ProjectRecord> {
        let mut projects = self.projects.write().await;
        let id = projects.keys().next_back().map_or(1, |last| last + 1);
        let now = Utc::now();

        let record = ProjectRecord {
            id,
            document_text: document_text.to_string(),
            screenshot_ref: screenshot_ref.to_string(),
            preview_link: None,
            run_id: None,
            created_at: now,
            updated_at: now,
        };
        projects.insert(id, record.clone());
        Ok(record)
    }

    async fn complete_project(
        &self,
        id: i64,
        preview_link: Option<&str>,
        run_id: Uuid,
    ) -> Result<ProjectRecord> {
        let mut projects = self.projects.write().await;
        let Some(record) = projects.get_mut(&id) else {
            anyhow::bail!("Project {} not found", id);
        };

        record.preview_link = preview_link.map(str::to_string);
        record.run_id = Some(run_id);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn get_project(&self, id: i64) -> Result<Option<ProjectRecord>> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.projects.read().await.values().cloned().collect())
    }

    async fn save_trace(&self, trace: &RunTrace) -> Result<()> {
        self.traces.write().await.insert(trace.run_id, trace.clone());
        Ok(())
    }

    async fn load_trace(&self, run_id: Uuid) -> Result<Option<RunTrace>> {
        Ok(self.traces.read().await.get(&run_id).cloned())
    }
}
