//! UI component generation with a per-name idempotence guard

use crate::core::{ComponentFiles, PipelineState, Stage, StageOutcome};
use crate::parsing::{detect_dependencies, parse_component_code};
use crate::prompts;
use crate::stages::StageContext;
use indexmap::IndexSet;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Normalise a component name to the kebab-case stem of its files and
/// directory (`LoginForm`, `login form` -> `login-form`). Empty when the name
/// has no ASCII letters or digits
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut previous: Option<char> = None;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = c.is_ascii_uppercase()
                && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if boundary && !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        previous = Some(c);
    }

    slug.trim_end_matches('-').to_string()
}

fn component_details(state: &PipelineState, name: &str) -> String {
    let mut details = vec![format!("Component: {}", name)];
    if let Some(analysis) = &state.document_analysis {
        if let Some(styling) = &analysis.styling {
            details.push(format!("Styling: {}", styling));
        }
        if let Some(accessibility) = &analysis.accessibility {
            details.push(format!("Accessibility: {}", accessibility));
        }
        if let Some(state_management) = &analysis.state_management {
            details.push(format!("State management: {}", state_management));
        }
    }
    details.join("\n")
}

pub async fn generate_components(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::GenerateComponents.name();

    if state.document_analysis.is_none() {
        warn!("No document analysis available; no components requested");
        state.record_error(stage, "No document analysis available");
    }

    let names: Vec<String> = state
        .requested_components()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    let mut requested: IndexSet<String> = IndexSet::new();
    for name in names {
        if name.is_empty() {
            state.record_error(stage, "Requested component has an empty name");
        } else {
            requested.insert(name);
        }
    }

    // Keys stay as requested; the slug names the files on disk and must be
    // unique across components
    let mut taken_slugs: HashMap<String, String> = state
        .ui_components
        .keys()
        .map(|name| (slugify(name), name.clone()))
        .collect();

    let mut generated = 0usize;
    for name in requested {
        if state.ui_components.contains_key(&name) {
            debug!("Component {} already generated, skipping", name);
            continue;
        }

        let file_stem = slugify(&name);
        if file_stem.is_empty() {
            warn!("No file name can be derived for component {}", name);
            state.record_error(stage, format!("Cannot derive a file name for component '{}'", name));
            continue;
        }
        if let Some(owner) = taken_slugs.get(&file_stem) {
            warn!("Component {} collides with {} on {}", name, owner, file_stem);
            state.record_error(
                stage,
                format!(
                    "Component '{}' maps to the same files ({}) as '{}'",
                    name, file_stem, owner
                ),
            );
            continue;
        }
        taken_slugs.insert(file_stem.clone(), name.clone());

        let existing: Vec<&str> = state.ui_components.keys().map(String::as_str).collect();
        let prompt = prompts::render(
            prompts::COMPONENT,
            &prompts::vars([
                ("component", name.clone()),
                ("file_stem", file_stem),
                ("existing_components", format!("{:?}", existing)),
                ("component_details", component_details(state, &name)),
            ]),
        );

        let response = match ctx.complete_text(prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!("Completion failed for component {}: {}", name, e);
                state.record_error(stage, format!("Completion failed for {}: {}", name, e));
                continue;
            }
        };

        let files = match parse_component_code(&response) {
            Ok(files) => files,
            Err(e) => {
                error!("Parsing failed for component {}: {}", name, e);
                state.record_error(stage, format!("Parsing failed for {}: {}", name, e));
                ComponentFiles::new()
            }
        };

        let dependencies = detect_dependencies(&files);
        debug!(
            "Component {}: {} files, {} module imports, {} tags",
            name,
            files.len(),
            dependencies.modules.len(),
            dependencies.components.len()
        );
        state.ui_dependencies.insert(name.clone(), dependencies.components);
        state.ui_components.insert(name, files);
        generated += 1;
    }

    // Snapshots written by older runs may lack dependency entries
    let missing: Vec<(String, Vec<String>)> = state
        .ui_components
        .iter()
        .filter(|(name, _)| !state.ui_dependencies.contains_key(*name))
        .map(|(name, files)| (name.clone(), detect_dependencies(files).components))
        .collect();
    state.ui_dependencies.extend(missing);

    info!(
        "Components: {} generated, {} total",
        generated,
        state.ui_components.len()
    );
    StageOutcome::Continue
}
