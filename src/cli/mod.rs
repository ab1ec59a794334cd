//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ListCommand, LogsCommand, ShowCommand, SubmitCommand, ValidateCommand};
use std::ffi::OsString;

/// Front-end project generator
#[derive(Debug, Parser, Clone)]
#[command(name = "frontgen")]
#[command(version = "0.1.0")]
#[command(
    about = "Generates a scaffolded front-end project from a requirements document and a screenshot",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to generator configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the pipeline over a document and screenshot
    Submit(SubmitCommand),

    /// Show a stored project
    Show(ShowCommand),

    /// Show the run trace of a stored project
    Logs(LogsCommand),

    /// List stored projects
    List(ListCommand),

    /// Validate a generator configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
