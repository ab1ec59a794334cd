//! API service generation

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::parsing::extract_code_block;
use crate::prompts;
use crate::stages::StageContext;
use tracing::{debug, error, info, warn};

const SERVICE_TAGS: &[&str] = &["typescript", "ts"];

pub const SERVICE_SUFFIX: &str = ".service.ts";

/// File name for an endpoint key: `POST /api/auth/login` ->
/// `post_api_auth_login.service.ts`
pub fn service_file_name(endpoint_key: &str) -> String {
    let mut stem = String::with_capacity(endpoint_key.len());
    for c in endpoint_key.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }

    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        format!("root{}", SERVICE_SUFFIX)
    } else {
        format!("{}{}", stem, SERVICE_SUFFIX)
    }
}

pub async fn generate_api_services(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::GenerateApiServices.name();

    if state.api_endpoints.is_empty() {
        info!("No API endpoints to integrate");
        return StageOutcome::Continue;
    }

    let mut generated = 0usize;
    for endpoint in state.api_endpoints.clone() {
        let key = endpoint.key();
        if state.api_services.contains_key(&key) {
            debug!("Service for {} already generated, skipping", key);
            continue;
        }

        let prompt = prompts::render(
            prompts::API_SERVICE,
            &prompts::vars([
                ("endpoint", key.clone()),
                (
                    "endpoint_details",
                    endpoint.description.clone().unwrap_or_else(|| key.clone()),
                ),
            ]),
        );

        let response = match ctx.complete_text(prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!("Completion failed for service {}: {}", key, e);
                state.record_error(stage, format!("Completion failed for {}: {}", key, e));
                continue;
            }
        };

        let code = match extract_code_block(&response, SERVICE_TAGS) {
            Some(code) => code,
            None => {
                warn!("No typescript block in service response for {}", key);
                state.record_error(
                    stage,
                    format!("No typescript block for {}; stored raw response", key),
                );
                response.trim().to_string()
            }
        };

        state.api_services.insert(key, code);
        generated += 1;
    }

    info!(
        "API services: {} generated, {} total",
        generated,
        state.api_services.len()
    );
    StageOutcome::Continue
}
