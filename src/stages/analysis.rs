//! Screenshot and requirements-document analysis

use crate::core::{PipelineState, ScreenshotAnalysis, Stage, StageOutcome};
use crate::llm::{CompletionRequest, ImageInput};
use crate::parsing::parse_document_analysis;
use crate::prompts;
use crate::stages::StageContext;
use tracing::{debug, error, info};

const NO_SCREENSHOT_DETAILS: &str = "No screenshot analysis available.";

pub async fn analyze_screenshot(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::AnalyzeScreenshot.name();

    if state.screenshot_url.trim().is_empty() {
        error!("Screenshot reference not provided");
        state.record_error(stage, "Screenshot reference not provided");
        return StageOutcome::Continue;
    }

    let media_dir = ctx.config.workspace.media_dir.as_deref();
    let image = match ImageInput::load(&state.screenshot_url, media_dir).await {
        Ok(image) => image,
        Err(e) => {
            error!("Error processing screenshot: {}", e);
            state.record_error(stage, format!("Error processing screenshot: {}", e));
            return StageOutcome::Continue;
        }
    };

    let request = CompletionRequest::with_image(prompts::SCREENSHOT_ANALYSIS, image);
    match ctx.complete(request).await {
        Ok(description) => {
            info!("Screenshot analysed ({} chars)", description.len());
            state.screenshot_analysis = Some(ScreenshotAnalysis {
                description: description.trim().to_string(),
            });
        }
        Err(e) => {
            error!("Screenshot analysis failed: {}", e);
            state.record_error(stage, format!("Completion failed: {}", e));
        }
    }

    StageOutcome::Continue
}

pub async fn analyze_document(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::AnalyzeDocument.name();

    if state.document_text.trim().is_empty() {
        error!("Document text is empty");
        state.record_error(stage, "Document text is empty");
        return StageOutcome::Continue;
    }

    let screenshot_details = state
        .screenshot_analysis
        .as_ref()
        .map(|a| a.description.clone())
        .unwrap_or_else(|| NO_SCREENSHOT_DETAILS.to_string());

    let prompt = prompts::render(
        prompts::DOCUMENT_ANALYSIS,
        &prompts::vars([
            ("document_text", state.document_text.clone()),
            ("screenshot_details", screenshot_details),
        ]),
    );

    let response = match ctx.complete_text(prompt).await {
        Ok(response) => response,
        Err(e) => {
            error!("Document analysis failed: {}", e);
            state.record_error(stage, format!("Completion failed: {}", e));
            return StageOutcome::Continue;
        }
    };

    match parse_document_analysis(&response) {
        Ok(analysis) => {
            info!(
                "Document analysed: {} components, {} endpoints",
                analysis.ui_components.len(),
                analysis.api_endpoints.len()
            );
            debug!("Requested components: {:?}", analysis.ui_components);
            state.api_endpoints = analysis.api_endpoints.clone();
            state.document_analysis = Some(analysis);
        }
        Err(e) => {
            error!("Parsing error: {}", e);
            state.record_error(stage, format!("Analysis parsing error: {}", e));
        }
    }

    StageOutcome::Continue
}
