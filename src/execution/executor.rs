//! Stage executor - dispatches a stage to its function

use crate::{
    core::{GeneratorConfig, Pipeline, PipelineState, Stage, StageOutcome},
    execution::CommandRunner,
    llm::CompletionClient,
    stages::{self, StageContext},
};
use tracing::info;

/// Runs individual stages with the run's collaborators
pub struct StageExecutor<C, R> {
    client: C,
    runner: R,
    config: GeneratorConfig,
    pipeline: Pipeline,
}

impl<C: CompletionClient, R: CommandRunner> StageExecutor<C, R> {
    pub fn new(client: C, runner: R, config: GeneratorConfig, pipeline: Pipeline) -> Self {
        Self {
            client,
            runner,
            config,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn context(&self) -> StageContext<'_> {
        StageContext {
            client: &self.client,
            runner: &self.runner,
            config: &self.config,
            pipeline: &self.pipeline,
        }
    }

    /// Execute one stage against the state
    pub async fn execute(&self, stage: Stage, state: &mut PipelineState) -> StageOutcome {
        info!("Executing stage: {}", stage);
        let ctx = self.context();

        match stage {
            Stage::AnalyzeScreenshot => stages::analysis::analyze_screenshot(state, &ctx).await,
            Stage::AnalyzeDocument => stages::analysis::analyze_document(state, &ctx).await,
            Stage::GenerateSetup => stages::setup::generate_setup(state, &ctx).await,
            Stage::ExecuteSetup => stages::setup::execute_setup(state, &ctx).await,
            Stage::GenerateComponents => stages::components::generate_components(state, &ctx).await,
            Stage::GenerateApiServices => stages::services::generate_api_services(state, &ctx).await,
            Stage::GenerateTests => stages::ui_tests::generate_tests(state, &ctx).await,
            Stage::GenerateContainerFile => {
                stages::container::generate_container_file(state, &ctx).await
            }
            Stage::Validate => stages::validation::validate(state, &ctx).await,
            Stage::GenerateDocumentation => {
                stages::documentation::generate_documentation(state, &ctx).await
            }
            Stage::PersistFiles => stages::persist::persist_files(state, &ctx).await,
            Stage::Deploy => stages::deploy::deploy(state, &ctx).await,
        }
    }
}
