//! CLI output formatting

use crate::{
    core::ExecutionStatus,
    execution::{ExecutionEvent, TraceEntry, TraceLevel},
    persistence::ProjectRecord,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub use console::style;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over `total` stages
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::CompletedWithErrors => style("COMPLETED WITH ERRORS").yellow().to_string(),
        ExecutionStatus::Halted => style("HALTED").red().to_string(),
    }
}

/// One-line project summary
pub fn format_project_summary(project: &ProjectRecord) -> String {
    let icon = if project.run_id.is_some() { CHECK } else { SPINNER };
    let preview = project
        .preview_link
        .as_deref()
        .map(|link| style(link).cyan().to_string())
        .unwrap_or_else(|| style("no preview").dim().to_string());

    format!(
        "{}#{} - {} - {} - {}",
        icon,
        style(project.id).bold(),
        style(&project.screenshot_ref).dim(),
        preview,
        style(project.created_at.format("%Y-%m-%d %H:%M:%S")).dim()
    )
}

/// Format one trace entry for display
pub fn format_trace_entry(entry: &TraceEntry) -> String {
    let level = match entry.level {
        TraceLevel::Info => style("INFO ").dim(),
        TraceLevel::Warn => style("WARN ").yellow(),
        TraceLevel::Error => style("ERROR").red(),
    };
    let stage = entry.stage.map(|s| s.name()).unwrap_or("run");

    format!(
        "{} {} {} {}",
        style(entry.at.format("%H:%M:%S%.3f")).dim(),
        level,
        style(stage).cyan(),
        entry.message
    )
}

/// Format a driver event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            run_id,
            pipeline_name,
            stage_count,
        } => format!(
            "{} Starting {} with {} stages ({})",
            ROCKET,
            style(pipeline_name).bold(),
            stage_count,
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StageStarted { stage, index } => {
            format!("{} [{}] {}", SPINNER, index + 1, style(stage).cyan())
        }
        ExecutionEvent::StageCompleted {
            stage,
            new_errors,
            elapsed_ms,
        } => {
            if *new_errors > 0 {
                format!(
                    "{} {} ({} errors, {} ms)",
                    WARN,
                    style(stage).yellow(),
                    new_errors,
                    elapsed_ms
                )
            } else {
                format!(
                    "{} {} ({} ms)",
                    CHECK,
                    style(stage).green(),
                    style(elapsed_ms).dim()
                )
            }
        }
        ExecutionEvent::StageHalted { stage, reason } => {
            format!("{} {}: {}", CROSS, style(stage).red(), style(reason).dim())
        }
        ExecutionEvent::PipelineCompleted { run_id, status } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}
