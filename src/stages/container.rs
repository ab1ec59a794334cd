//! Container build file generation

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::parsing::extract_code_block;
use crate::prompts;
use crate::stages::StageContext;
use tracing::{error, info, warn};

/// One-line summary of the project for prompts
pub fn project_details(state: &PipelineState) -> String {
    let components: Vec<&str> = state.ui_components.keys().map(String::as_str).collect();
    let endpoints: Vec<String> = state.api_endpoints.iter().map(|e| e.key()).collect();
    let analysis = state.document_analysis.as_ref();

    format!(
        "Components: {:?}, State management: {}, API endpoints: {:?}, Accessibility: {}, Styling: {}",
        components,
        analysis
            .and_then(|a| a.state_management.as_deref())
            .unwrap_or("unspecified"),
        endpoints,
        analysis
            .and_then(|a| a.accessibility.as_deref())
            .unwrap_or("unspecified"),
        analysis
            .and_then(|a| a.styling.as_deref())
            .unwrap_or("unspecified"),
    )
}

pub async fn generate_container_file(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::GenerateContainerFile.name();

    let prompt = prompts::render(
        prompts::CONTAINER_FILE,
        &prompts::vars([("project_details", project_details(state))]),
    );

    match ctx.complete_text(prompt).await {
        Ok(response) => {
            let content = match extract_code_block(&response, &["dockerfile", "docker"]) {
                Some(content) => content,
                None => {
                    warn!("No dockerfile block in response; storing raw text");
                    state.record_error(stage, "No dockerfile block; stored raw response");
                    response.trim().to_string()
                }
            };
            info!("Container file generated ({} lines)", content.lines().count());
            state.container_file_content = Some(content);
        }
        Err(e) => {
            error!("Error generating container file: {}", e);
            state.record_error(stage, format!("Completion failed: {}", e));
        }
    }

    StageOutcome::Continue
}
