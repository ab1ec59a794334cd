//! Deployment stub

use crate::core::{PipelineState, StageOutcome};
use crate::stages::StageContext;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn deploy(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let has_container_file = state
        .container_file_content
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if !has_container_file {
        warn!("No container file generated; preview link is a placeholder only");
    }

    let link = format!(
        "{}/{}",
        ctx.config.deploy.preview_base_url.trim_end_matches('/'),
        Uuid::new_v4()
    );
    info!("Preview link: {}", link);
    state.preview_link = Some(link);

    StageOutcome::Continue
}
