//! Model-driven review of the generated code

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::prompts;
use crate::stages::{ui_tests::component_listing, StageContext};
use tracing::{error, info};

pub async fn validate(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::Validate.name();

    let generated_code = state
        .ui_components
        .iter()
        .map(|(name, files)| format!("## {}\n{}", name, component_listing(files)))
        .collect::<Vec<_>>()
        .join("\n\n");
    let screenshot_details = state
        .screenshot_analysis
        .as_ref()
        .map(|a| a.description.clone())
        .unwrap_or_else(|| "unavailable".to_string());

    let prompt = prompts::render(
        prompts::VALIDATION,
        &prompts::vars([
            ("generated_code", generated_code),
            ("document_text", state.document_text.clone()),
            ("screenshot_details", screenshot_details),
        ]),
    );

    match ctx.complete_text(prompt).await {
        Ok(report) => {
            info!("Validation report received ({} chars)", report.len());
            state.validation_report = Some(report.trim().to_string());
        }
        Err(e) => {
            error!("Validation failed: {}", e);
            state.record_error(stage, format!("Completion failed: {}", e));
        }
    }

    StageOutcome::Continue
}
