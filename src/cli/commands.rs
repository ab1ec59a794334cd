//! CLI command definitions

use clap::Args;
use std::path::PathBuf;

/// Run the pipeline
#[derive(Debug, Args, Clone)]
pub struct SubmitCommand {
    /// Requirements document (.txt, .md)
    #[arg(short, long, required_unless_present = "resume")]
    pub document: Option<PathBuf>,

    /// Screenshot file path or http(s) URL
    #[arg(short, long, required_unless_present = "resume")]
    pub screenshot: Option<String>,

    /// Resume from a state saved with --save-state
    #[arg(long, conflicts_with_all = ["document", "screenshot"])]
    pub resume: Option<PathBuf>,

    /// Write the final state as JSON
    #[arg(long)]
    pub save_state: Option<PathBuf>,

    /// Override the workspace output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Run only these stages, in this order (repeatable)
    #[arg(long)]
    pub stage: Vec<String>,

    /// Don't store the project and its run trace
    #[arg(long)]
    pub no_store: bool,
}

/// Show a stored project
#[derive(Debug, Args, Clone)]
pub struct ShowCommand {
    /// Project id
    pub id: i64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the run trace of a stored project
#[derive(Debug, Args, Clone)]
pub struct LogsCommand {
    /// Project id
    pub id: i64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List stored projects
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a generator configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to configuration YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Print the stage sequence as a Mermaid flowchart
    #[arg(long)]
    pub mermaid: bool,
}
