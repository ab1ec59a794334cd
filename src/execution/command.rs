//! Shell command runner for scaffolding commands

use crate::core::config::SetupConfig;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Error types for command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to spawn command: {0}")]
    Spawn(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Command exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait for command execution - allows tests to substitute a fake
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one command line with `cwd` as working directory
    async fn run(&self, line: &str, cwd: &Path) -> Result<CommandOutput, CommandError>;
}

/// Runs lines through `<shell> -c`
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    /// Shell executable
    shell: String,

    /// Timeout for one command in seconds
    timeout_secs: u64,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            shell: shell.into(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &SetupConfig) -> Self {
        Self::new(config.shell.clone(), config.command_timeout_secs)
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, line: &str, cwd: &Path) -> Result<CommandOutput, CommandError> {
        debug!("Running `{}` in {}", line, cwd.display());

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.shell)
                .arg("-c")
                .arg(line)
                .current_dir(cwd)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| CommandError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|e| CommandError::Spawn(e.to_string()))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!("`{}` exited with code {}: {}", line, code, stderr.trim());
            return Err(CommandError::Failed {
                code,
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("`{}` produced {} bytes of output", line, stdout.len());
        Ok(CommandOutput { stdout, stderr })
    }
}
