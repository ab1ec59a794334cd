//! Scaffolding command generation and execution

use crate::core::{PipelineState, Stage, StageOutcome};
use crate::prompts;
use crate::stages::StageContext;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

pub async fn generate_setup(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::GenerateSetup.name();

    let analysis = state
        .document_analysis
        .as_ref()
        .and_then(|a| serde_json::to_string(a).ok())
        .unwrap_or_else(|| "{}".to_string());
    let state_management = state
        .document_analysis
        .as_ref()
        .and_then(|a| a.state_management.clone())
        .unwrap_or_else(|| "NgRx or Services-based".to_string());

    let prompt = prompts::render(
        prompts::SETUP,
        &prompts::vars([
            ("analysis", analysis),
            ("project_name", ctx.config.workspace.project_name.clone()),
            ("state_management", state_management),
        ]),
    );

    match ctx.complete_text(prompt).await {
        Ok(commands) => {
            info!("Setup commands generated ({} lines)", commands.lines().count());
            state.setup_commands = Some(commands);
        }
        Err(e) => {
            error!("Setup generation failed: {}", e);
            state.record_error(stage, format!("Completion failed: {}", e));
        }
    }

    StageOutcome::Continue
}

/// Strip prompt markers and markdown decoration; `None` for non-commands
fn command_line(raw: &str) -> Option<&str> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("```") || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("$ ").unwrap_or(line);
    let line = line.trim_matches('`').trim();
    (!line.is_empty()).then_some(line)
}

fn unquote(arg: &str) -> &str {
    arg.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Resolve `target` against `cwd`, staying inside `base`
fn resolve_in_workspace(base: &Path, cwd: &Path, target: &str) -> Result<PathBuf, String> {
    let target = Path::new(unquote(target));
    if target.as_os_str().is_empty() {
        return Err("missing path".to_string());
    }

    let mut parts: Vec<PathBuf> = cwd
        .strip_prefix(base)
        .map_err(|_| format!("working directory left the workspace: {}", cwd.display()))?
        .components()
        .map(|c| PathBuf::from(c.as_os_str()))
        .collect();

    for component in target.components() {
        match component {
            Component::Normal(part) => parts.push(PathBuf::from(part)),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(format!("path escapes the workspace: {}", target.display()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("absolute paths are not allowed: {}", target.display()));
            }
        }
    }

    Ok(parts.iter().fold(base.to_path_buf(), |acc, p| acc.join(p)))
}

async fn append_line(file: &Path, content: &str) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut handle = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .await?;
    handle.write_all(content.as_bytes()).await?;
    handle.write_all(b"\n").await
}

/// Outcome of one command segment
enum Segment {
    Done,
    Skipped,
    Failed(String),
    Fatal(String),
}

struct SetupRun<'a, 'b> {
    ctx: &'a StageContext<'b>,
    base: PathBuf,
    cwd: PathBuf,
}

impl SetupRun<'_, '_> {
    async fn run_segment(&mut self, segment: &str) -> Segment {
        let (program, rest) = match segment.split_once(char::is_whitespace) {
            Some((program, rest)) => (program, rest.trim()),
            None => (segment, ""),
        };

        match program {
            "cd" => match resolve_in_workspace(&self.base, &self.cwd, rest) {
                Ok(dir) if dir.is_dir() => {
                    debug!("cd {}", dir.display());
                    self.cwd = dir;
                    Segment::Done
                }
                Ok(dir) => Segment::Failed(format!("cd: no such directory: {}", dir.display())),
                Err(e) => Segment::Failed(format!("cd: {}", e)),
            },
            "mkdir" => {
                for arg in rest.split_whitespace().filter(|a| !a.starts_with('-')) {
                    let dir = match resolve_in_workspace(&self.base, &self.cwd, arg) {
                        Ok(dir) => dir,
                        Err(e) => return Segment::Failed(format!("mkdir: {}", e)),
                    };
                    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
                        return Segment::Failed(format!("mkdir {}: {}", dir.display(), e));
                    }
                }
                Segment::Done
            }
            "touch" => {
                for arg in rest.split_whitespace().filter(|a| !a.starts_with('-')) {
                    let file = match resolve_in_workspace(&self.base, &self.cwd, arg) {
                        Ok(file) => file,
                        Err(e) => return Segment::Failed(format!("touch: {}", e)),
                    };
                    let created = tokio::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&file)
                        .await;
                    if let Err(e) = created {
                        return Segment::Failed(format!("touch {}: {}", file.display(), e));
                    }
                }
                Segment::Done
            }
            "echo" if rest.contains('>') => {
                let Some((content, target)) = rest.rsplit_once('>') else {
                    return Segment::Skipped;
                };
                let append = content.ends_with('>');
                let content = unquote(content.trim_end_matches('>'));

                let file = match resolve_in_workspace(&self.base, &self.cwd, target.trim()) {
                    Ok(file) => file,
                    Err(e) => return Segment::Failed(format!("echo: {}", e)),
                };
                if let Some(parent) = file.parent() {
                    if let Err(e) = tokio::fs::create_dir_all(parent).await {
                        return Segment::Failed(format!("echo {}: {}", file.display(), e));
                    }
                }

                let written = if append {
                    append_line(&file, content).await
                } else {
                    tokio::fs::write(&file, content).await
                };
                match written {
                    Ok(()) => Segment::Done,
                    Err(e) => Segment::Failed(format!("echo {}: {}", file.display(), e)),
                }
            }
            _ => self.run_program(segment).await,
        }
    }

    async fn run_program(&self, segment: &str) -> Segment {
        let setup = &self.ctx.config.setup;
        if !setup.allowed_prefixes.iter().any(|p| segment.starts_with(p.as_str())) {
            debug!("Ignoring setup line: {}", segment);
            return Segment::Skipped;
        }

        info!("Executing command: {}", segment);
        match self.ctx.runner.run(segment, &self.cwd).await {
            Ok(_) => Segment::Done,
            Err(e) => {
                let message = format!("`{}` failed: {}", segment, e);
                if setup.fatal_prefixes.iter().any(|p| segment.starts_with(p.as_str())) {
                    Segment::Fatal(message)
                } else {
                    Segment::Failed(message)
                }
            }
        }
    }
}

pub async fn execute_setup(state: &mut PipelineState, ctx: &StageContext<'_>) -> StageOutcome {
    let stage = Stage::ExecuteSetup.name();

    let Some(commands) = state.setup_commands.clone() else {
        warn!("No setup commands to execute");
        state.record_error(stage, "No setup commands to execute");
        return StageOutcome::Continue;
    };

    let base = ctx.config.workspace.output_dir.clone();
    if let Err(e) = tokio::fs::create_dir_all(&base).await {
        error!("Cannot create {}: {}", base.display(), e);
        state.record_error(stage, format!("Cannot create {}: {}", base.display(), e));
        return StageOutcome::Continue;
    }

    let mut run = SetupRun {
        ctx,
        cwd: base.clone(),
        base,
    };
    let (mut executed, mut failed) = (0usize, 0usize);

    for line in commands.lines().filter_map(command_line) {
        for segment in line.split("&&").map(str::trim).filter(|s| !s.is_empty()) {
            match run.run_segment(segment).await {
                Segment::Done => executed += 1,
                Segment::Skipped => {}
                Segment::Failed(message) => {
                    failed += 1;
                    error!("{}", message);
                    state.record_error(stage, message);
                }
                Segment::Fatal(message) => {
                    error!("{}. Stopping execution.", message);
                    state.record_error(stage, &message);
                    return StageOutcome::halt(message);
                }
            }
        }
    }

    info!("Setup executed: {} commands, {} failed", executed, failed);
    StageOutcome::Continue
}
