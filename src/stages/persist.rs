//! Writes generated artefacts into the project workspace

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::stages::components::slugify;
use crate::stages::services::{service_file_name, SERVICE_SUFFIX};
use crate::stages::{is_safe_segment, resolve_within, StageContext};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const COMPONENTS_DIR: &str = "src/app/components";
pub const SERVICES_DIR: &str = "src/app/services";
pub const TESTS_DIR: &str = "tests";
pub const CONTAINER_FILE: &str = "Dockerfile";

/// `stem.service.ts`, or `stem_2.service.ts` and upwards when an earlier
/// endpoint already took that name
fn unique_service_file(endpoint: &str, taken: &mut HashSet<String>) -> String {
    let base = service_file_name(endpoint);
    if taken.insert(base.clone()) {
        return base;
    }
    let stem = base.trim_end_matches(SERVICE_SUFFIX);
    (2..)
        .map(|n| format!("{}_{}{}", stem, n, SERVICE_SUFFIX))
        .find(|candidate| taken.insert(candidate.clone()))
        .unwrap_or(base)
}

/// Everything the stage intends to write, relative to the project root,
/// plus the reasons anything was left out
fn planned_files(state: &PipelineState) -> (Vec<(String, &str)>, Vec<String>) {
    let mut files: Vec<(String, &str)> = Vec::new();
    let mut rejected = Vec::new();

    for (component, component_files) in &state.ui_components {
        let dir = slugify(component);
        if !is_safe_segment(&dir) {
            rejected.push(format!("cannot derive a directory name for component: {}", component));
            continue;
        }
        for (file_name, content) in component_files {
            if is_safe_segment(file_name) {
                files.push((
                    format!("{}/{}/{}", COMPONENTS_DIR, dir, file_name),
                    content.as_str(),
                ));
            } else {
                rejected.push(format!("unsafe file name: {}/{}", component, file_name));
            }
        }
    }

    let mut service_files = HashSet::new();
    for (endpoint, code) in &state.api_services {
        let file_name = unique_service_file(endpoint, &mut service_files);
        if file_name != service_file_name(endpoint) {
            warn!("Service {} renamed to {} to avoid a collision", endpoint, file_name);
        }
        files.push((format!("{}/{}", SERVICES_DIR, file_name), code.as_str()));
    }

    for (component, code) in &state.ui_tests {
        let stem = slugify(component);
        if is_safe_segment(&stem) {
            files.push((format!("{}/{}.spec.ts", TESTS_DIR, stem), code.as_str()));
        } else {
            rejected.push(format!("cannot derive a test file name for component: {}", component));
        }
    }

    if let Some(content) = state.container_file_content.as_deref() {
        if !content.trim().is_empty() {
            files.push((CONTAINER_FILE.to_string(), content));
        }
    }

    for (path, content) in &state.documentation {
        files.push((path.clone(), content.as_str()));
    }

    // The first claim on a path wins
    let mut seen = HashSet::new();
    files.retain(|(path, _)| {
        let fresh = seen.insert(path.trim().to_string());
        if !fresh {
            rejected.push(format!("path collision, not overwriting: {}", path));
        }
        fresh
    });

    (files, rejected)
}

async fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

pub async fn persist_files(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::PersistFiles.name();
    let root = ctx.project_dir();

    let (files, rejected) = planned_files(state);
    let mut failures = rejected;
    let mut written = 0usize;

    for (relative, content) in files {
        let path: PathBuf = match resolve_within(&root, &relative) {
            Ok(path) => path,
            Err(e) => {
                failures.push(e);
                continue;
            }
        };

        match write_file(&path, content).await {
            Ok(()) => {
                debug!("Wrote {}", path.display());
                written += 1;
            }
            Err(e) => failures.push(format!("failed to write {}: {}", path.display(), e)),
        }
    }

    for failure in failures {
        error!("{}", failure);
        state.record_error(stage, failure);
    }

    info!("Wrote {} files to {}", written, root.display());
    StageOutcome::Continue
}
