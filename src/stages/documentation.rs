//! Project documentation: README, per-component docs and a workflow diagram

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::prompts;
use crate::stages::components::slugify;
use crate::stages::{container::project_details, ui_tests::component_listing, StageContext};
use tracing::{debug, error, info};

pub const README_PATH: &str = "README.md";
pub const WORKFLOW_PATH: &str = "docs/workflow.md";

/// `docs/<slug>.md` for a component name
pub fn component_doc_path(component: &str) -> String {
    format!("docs/{}.md", slugify(component))
}

/// Markdown page embedding the stage sequence as a Mermaid chart
pub fn workflow_page(ctx: &StageContext<'_>) -> String {
    format!(
        "# {} workflow\n\n```mermaid\n{}```\n",
        ctx.pipeline.name,
        ctx.pipeline.to_mermaid()
    )
}

pub async fn generate_documentation(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::GenerateDocumentation.name();

    let readme_prompt = prompts::render(
        prompts::README,
        &prompts::vars([
            ("project_name", ctx.config.workspace.project_name.clone()),
            ("project_details", project_details(state)),
        ]),
    );
    match ctx.complete_text(readme_prompt).await {
        Ok(readme) => {
            state
                .documentation
                .insert(README_PATH.to_string(), readme.trim().to_string());
        }
        Err(e) => {
            error!("README generation failed: {}", e);
            state.record_error(stage, format!("Completion failed for README: {}", e));
        }
    }

    let pending: Vec<(String, String)> = state
        .ui_components
        .iter()
        .filter(|(name, _)| !slugify(name).is_empty())
        .filter(|(name, _)| !state.documentation.contains_key(&component_doc_path(name)))
        .map(|(name, files)| (name.clone(), component_listing(files)))
        .collect();

    for (component, code) in pending {
        let prompt = prompts::render(
            prompts::COMPONENT_DOC,
            &prompts::vars([("component", component.clone()), ("component_code", code)]),
        );
        match ctx.complete_text(prompt).await {
            Ok(doc) => {
                debug!("Component documentation generated: {}", component);
                state
                    .documentation
                    .insert(component_doc_path(&component), doc.trim().to_string());
            }
            Err(e) => {
                error!("Documentation failed for {}: {}", component, e);
                state.record_error(stage, format!("Completion failed for {}: {}", component, e));
            }
        }
    }

    state
        .documentation
        .insert(WORKFLOW_PATH.to_string(), workflow_page(ctx));

    info!("Documentation: {} pages", state.documentation.len());
    StageOutcome::Continue
}
