//! SQLite-based persistence store

use crate::core::ExecutionStatus;
use crate::execution::{RunTrace, TraceEntry};
use crate::persistence::{ProjectRecord, ProjectStore};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

const PROJECT_COLUMNS: &str =
    "id, document_text, screenshot_ref, preview_link, run_id, created_at, updated_at";

/// SQLite project store
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    /// Open (or create) a database file; `:memory:` gives a private in-memory database
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
            .context("Invalid database path")?
            .create_if_missing(true);

        // One connection so an in-memory database is shared by every query
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Open the store at `path`, creating parent directories
    pub async fn at_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::new(&path.to_string_lossy()).await
    }

    /// Default database location under the local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("frontgen")
            .join("projects.db")
    }

    /// Create store with default path
    pub async fn with_default_path() -> Result<Self> {
        Self::at_path(&Self::default_path()).await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_text TEXT NOT NULL,
                screenshot_ref TEXT NOT NULL,
                preview_link TEXT,
                run_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS run_traces (
                run_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                started_at TEXT NOT NULL,
                completed_at TEXT,
                entries TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Convert DateTime<Utc> to NaiveDateTime for SQLite
    fn to_naive(dt: DateTime<Utc>) -> NaiveDateTime {
        dt.naive_utc()
    }

    /// Convert NaiveDateTime to DateTime<Utc>
    fn from_naive(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    fn project_from_row(row: &SqliteRow) -> Result<ProjectRecord> {
        let run_id = row
            .get::<Option<String>, _>("run_id")
            .map(|id| Uuid::parse_str(&id))
            .transpose()?;

        Ok(ProjectRecord {
            id: row.get("id"),
            document_text: row.get("document_text"),
            screenshot_ref: row.get("screenshot_ref"),
            preview_link: row.get("preview_link"),
            run_id,
            created_at: Self::from_naive(row.get("created_at")),
            updated_at: Self::from_naive(row.get("updated_at")),
        })
    }
}

#[async_trait::async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn create_project(&self, document_text: &str, screenshot_ref: &str) -> Result<ProjectRecord> {
        let now = Self::to_naive(Utc::now());
        let result = sqlx::query(
            r#"
            INSERT INTO projects (document_text, screenshot_ref, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(document_text)
        .bind(screenshot_ref)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create project")?;

        let id = result.last_insert_rowid();
        self.get_project(id)
            .await?
            .with_context(|| format!("Project {} vanished after insert", id))
    }

    async fn complete_project(
        &self,
        id: i64,
        preview_link: Option<&str>,
        run_id: Uuid,
    ) -> Result<ProjectRecord> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET preview_link = ?1, run_id = ?2, updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(preview_link)
        .bind(run_id.to_string())
        .bind(Self::to_naive(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update project")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Project {} not found", id);
        }

        self.get_project(id)
            .await?
            .with_context(|| format!("Project {} not found", id))
    }

    async fn get_project(&self, id: i64) -> Result<Option<ProjectRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load project")?;

        row.as_ref().map(Self::project_from_row).transpose()
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects ORDER BY id ASC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list projects")?;

        rows.iter().map(Self::project_from_row).collect()
    }

    async fn save_trace(&self, trace: &RunTrace) -> Result<()> {
        let entries = serde_json::to_string(&trace.entries)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO run_traces
            (run_id, status, started_at, completed_at, entries)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(trace.run_id.to_string())
        .bind(format!("{:?}", trace.status))
        .bind(Self::to_naive(trace.started_at))
        .bind(trace.completed_at.map(Self::to_naive))
        .bind(entries)
        .execute(&self.pool)
        .await
        .context("Failed to save run trace")?;

        Ok(())
    }

    async fn load_trace(&self, run_id: Uuid) -> Result<Option<RunTrace>> {
        let row = sqlx::query(
            r#"
            SELECT run_id, status, started_at, completed_at, entries
            FROM run_traces
            WHERE run_id = ?1
            "#,
        )
        .bind(run_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load run trace")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_name: String = row.get("status");
        let entries: Vec<TraceEntry> = serde_json::from_str(&row.get::<String, _>("entries"))
            .context("Corrupt run trace entries")?;

        Ok(Some(RunTrace {
            run_id: Uuid::parse_str(&row.get::<String, _>("run_id"))?,
            status: ExecutionStatus::from_name(&status_name)
                .with_context(|| format!("Unknown run status: {}", status_name))?,
            started_at: Self::from_naive(row.get("started_at")),
            completed_at: row
                .get::<Option<NaiveDateTime>, _>("completed_at")
                .map(Self::from_naive),
            entries,
        }))
    }
}
