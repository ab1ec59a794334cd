use anyhow::{Context, Result};
use frontgen::cli::commands::{ListCommand, LogsCommand, ShowCommand, SubmitCommand, ValidateCommand};
use frontgen::cli::output::*;
use frontgen::cli::{Cli, Command};
use frontgen::core::{ExecutionStatus, GeneratorConfig, Pipeline, PipelineState};
use frontgen::execution::{ExecutionEvent, PipelineDriver, ShellCommandRunner};
use frontgen::llm::{CompletionClientConfig, OpenAiCompatibleClient};
use frontgen::persistence::{InMemoryProjectStore, ProjectRecord};
use frontgen::service::{ProjectService, ServiceError, SubmitInput};
use tracing::{error, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Submit(cmd) => submit(cmd, &cli).await?,
        Command::Show(cmd) => show_project(cmd, &cli).await?,
        Command::Logs(cmd) => show_logs(cmd, &cli).await?,
        Command::List(cmd) => list_projects(cmd, &cli).await?,
        Command::Validate(cmd) => validate_config(cmd)?,
    }

    Ok(())
}

/// Load the configuration named by `--config`, or the defaults
fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Ok(GeneratorConfig::default()),
    }
}

#[cfg(feature = "sqlite")]
async fn open_service(config: &GeneratorConfig) -> Result<ProjectService> {
    use frontgen::persistence::SqliteProjectStore;

    let path = config
        .database
        .path
        .clone()
        .unwrap_or_else(SqliteProjectStore::default_path);
    let store = SqliteProjectStore::at_path(&path)
        .await
        .with_context(|| format!("Failed to open project store at {}", path.display()))?;
    Ok(ProjectService::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn open_service(_config: &GeneratorConfig) -> Result<ProjectService> {
    warn!("Built without the sqlite feature; projects are kept in memory only");
    Ok(ProjectService::new(InMemoryProjectStore::new()))
}

async fn submit(cmd: &SubmitCommand, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;

    if let Some(output_dir) = &cmd.output_dir {
        config.workspace.output_dir = output_dir.clone();
    }
    if !cmd.stage.is_empty() {
        config.stages = cmd.stage.clone();
    }
    let pipeline = Pipeline::from_config(&config).context("Invalid stage selection")?;

    println!(
        "{} Pipeline {} ({} stages) into {}",
        INFO,
        style(&pipeline.name).bold(),
        style(pipeline.stages.len()).cyan(),
        style(config.workspace.project_dir().display()).dim()
    );

    let client_config = CompletionClientConfig::from_llm_config(&config.llm);
    if client_config.api_key.is_none() {
        warn!(
            "{} is not set; requests to {} are unauthenticated",
            config.llm.api_key_env, config.llm.endpoint
        );
    }
    let client = OpenAiCompatibleClient::new(client_config)?;
    let runner = ShellCommandRunner::from_config(&config.setup);

    let service = if cmd.no_store {
        ProjectService::new(InMemoryProjectStore::new())
    } else {
        open_service(&config).await?
    };

    let input = match &cmd.resume {
        Some(path) => {
            let state = PipelineState::load(path)
                .with_context(|| format!("Failed to load state from {}", path.display()))?;
            println!(
                "{} Resuming from {} (iteration {})",
                INFO,
                style(path.display()).dim(),
                state.iteration_count
            );
            SubmitInput::Resume(state)
        }
        None => SubmitInput::Fresh {
            document: cmd.document.clone().context("--document is required")?,
            screenshot_ref: cmd.screenshot.clone().context("--screenshot is required")?,
        },
    };

    let progress = create_progress_bar(pipeline.stages.len());
    let bar = progress.clone();
    let driver = PipelineDriver::with_pipeline(client, runner, config, pipeline).with_event_handler(
        move |event| {
            match &event {
                ExecutionEvent::StageStarted { stage, .. } => bar.set_message(stage.to_string()),
                ExecutionEvent::StageCompleted { .. } | ExecutionEvent::StageHalted { .. } => {
                    bar.inc(1)
                }
                _ => {}
            }
            bar.println(format_execution_event(&event));
        },
    );

    let submission = service.submit(&driver, input).await;
    progress.finish_and_clear();
    let submission = submission?;

    let state = &submission.outcome.state;
    if let Some(path) = &cmd.save_state {
        state
            .save(path)
            .with_context(|| format!("Failed to save state to {}", path.display()))?;
        println!("{} State saved to {}", INFO, style(path.display()).dim());
    }

    println!();
    print_project_details(&submission.project);
    println!("  Status: {}", format_status(submission.outcome.status));
    println!("  Components: {}", style(state.ui_components.len()).cyan());
    println!("  Services: {}", style(state.api_services.len()).cyan());
    println!("  Tests: {}", style(state.ui_tests.len()).cyan());

    if !state.errors.is_empty() {
        println!("\n{} {} errors recorded:", WARN, state.errors.len());
        for note in &state.errors {
            println!("  {}", style(note).yellow());
        }
    }

    match submission.outcome.status {
        ExecutionStatus::Halted => {
            println!("\n{} Pipeline {}", CROSS, style("halted").red());
            std::process::exit(1);
        }
        ExecutionStatus::CompletedWithErrors => {
            println!("\n{} Pipeline completed {}", WARN, style("with errors").yellow());
        }
        _ => {
            println!("\n{} Pipeline completed {}", CHECK, style("successfully").green());
        }
    }

    Ok(())
}

async fn show_project(cmd: &ShowCommand, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let service = open_service(&config).await?;

    match service.get(cmd.id).await {
        Ok(project) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                print_project_details(&project);
            }
            Ok(())
        }
        Err(ServiceError::NotFound(id)) => {
            println!("{} Project {} not found", WARN, id);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn show_logs(cmd: &LogsCommand, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let service = open_service(&config).await?;

    let trace = match service.logs(cmd.id).await {
        Ok(trace) => trace,
        Err(
            e @ (ServiceError::NotFound(_) | ServiceError::NoRun(_) | ServiceError::TraceNotFound(_)),
        ) => {
            println!("{} {}", WARN, e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    println!(
        "{} Run {} - {}",
        INFO,
        style(trace.run_id).cyan(),
        format_status(trace.status)
    );
    for entry in &trace.entries {
        println!("  {}", format_trace_entry(entry));
    }

    Ok(())
}

async fn list_projects(cmd: &ListCommand, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let service = open_service(&config).await?;
    let projects = service.list().await?;

    if cmd.json {
        let data = serde_json::json!({ "projects": projects });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("{} No projects found", INFO);
        return Ok(());
    }

    println!("{} Projects:", INFO);
    for project in &projects {
        println!("  {}", format_project_summary(project));
    }

    Ok(())
}

fn validate_config(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating configuration...", INFO);

    match GeneratorConfig::from_file(&cmd.file) {
        Ok(config) => {
            let pipeline = Pipeline::from_config(&config)?;
            println!("{} Configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Stages: {}", style(pipeline.stages.len()).cyan());
            println!("  Model: {}", style(&config.llm.model).cyan());
            println!(
                "  Project: {}",
                style(config.workspace.project_dir().display()).dim()
            );

            if cmd.json {
                println!("\n{}", serde_json::to_string_pretty(&config)?);
            }
            if cmd.mermaid {
                println!("\n{}", pipeline.to_mermaid());
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(&e).red());
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn print_project_details(project: &ProjectRecord) {
    println!("{} Project {}", INFO, style(project.id).bold());
    println!("  Screenshot: {}", style(&project.screenshot_ref).dim());
    match &project.preview_link {
        Some(link) => println!("  Preview: {}", style(link).cyan()),
        None => println!("  Preview: {}", style("none").dim()),
    }
    if let Some(run_id) = project.run_id {
        println!("  Run: {}", style(run_id).dim());
    }
    println!("  Created: {}", style(project.created_at.to_rfc3339()).dim());
    println!("  Updated: {}", style(project.updated_at.to_rfc3339()).dim());
    println!(
        "  Document: {} chars",
        style(project.document_text.chars().count()).cyan()
    );
}
