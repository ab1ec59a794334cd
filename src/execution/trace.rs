//! Run traces - the log of one driver run

use crate::core::{ExecutionStatus, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Info,
    Warn,
    Error,
}

impl TraceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceLevel::Info => "info",
            TraceLevel::Warn => "warn",
            TraceLevel::Error => "error",
        }
    }
}

/// One line of a run trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at: DateTime<Utc>,
    /// `None` for pipeline-level entries
    pub stage: Option<Stage>,
    pub level: TraceLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    pub run_id: Uuid,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub entries: Vec<TraceEntry>,
}

impl RunTrace {
    /// Start a trace for a run that is now running
    pub fn start(run_id: Uuid) -> Self {
        Self {
            run_id,
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: Option<Stage>, level: TraceLevel, message: impl Into<String>) {
        self.entries.push(TraceEntry {
            at: Utc::now(),
            stage,
            level,
            message: message.into(),
        });
    }

    pub fn finish(&mut self, status: ExecutionStatus) {
        self.status = status;
        self.completed_at = Some(Utc::now());
    }

    /// Entries at `level`
    pub fn entries_at(&self, level: TraceLevel) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }
}
