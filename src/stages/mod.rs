//! Stage functions
//!
//! Each stage reads the [`PipelineState`](crate::core::PipelineState),
//! optionally calls the completion client, and writes only the fields it
//! owns. Failures are appended to `errors`; only a fatal setup command
//! returns [`StageOutcome::Halt`](crate::core::StageOutcome).

pub mod analysis;
pub mod components;
pub mod container;
pub mod deploy;
pub mod documentation;
pub mod persist;
pub mod services;
pub mod setup;
pub mod validation;

use crate::core::{GeneratorConfig, Pipeline};
use crate::execution::CommandRunner;
use crate::llm::{CompletionClient, CompletionError, CompletionRequest};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Collaborators and settings shared by every stage of one run
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub client: &'a dyn CompletionClient,
    pub runner: &'a dyn CommandRunner,
    pub config: &'a GeneratorConfig,
    pub pipeline: &'a Pipeline,
}

impl<'a> StageContext<'a> {
    /// Complete a request, bounded by `llm.timeout_secs`, returning the text
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let timeout_secs = self.config.llm.timeout_secs;
        debug!("Sending prompt of {} chars", request.prompt.len());

        let completion = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.client.complete(&request),
        )
        .await
        .map_err(|_| CompletionError::Timeout(timeout_secs))??;

        debug!("Received {} chars", completion.content.len());
        Ok(completion.content)
    }

    /// Text-only shorthand for [`StageContext::complete`]
    pub async fn complete_text(&self, prompt: String) -> Result<String, CompletionError> {
        self.complete(CompletionRequest::text(prompt)).await
    }

    /// Root of the generated project
    pub fn project_dir(&self) -> PathBuf {
        self.config.workspace.project_dir()
    }
}

/// Join `relative` onto `root`, refusing anything that could leave `root`
pub fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, String> {
    let path = Path::new(relative.trim());
    if path.as_os_str().is_empty() {
        return Err("empty path".to_string());
    }

    let mut resolved = root.to_path_buf();
    for component in path.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return Err(format!("path escapes the workspace: {}", relative)),
        }
    }

    if resolved == root {
        return Err(format!("path does not name a file: {}", relative));
    }
    Ok(resolved)
}

/// A single path segment: no separators, not `.` or `..`
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}
