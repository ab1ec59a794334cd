//! Generator configuration from YAML

use crate::core::stage::Stage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Pipeline name (shown in logs and the workflow diagram)
    #[serde(default = "default_name")]
    pub name: String,

    /// Ordered stage names to run
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,

    /// Completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Where generated projects are written
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Scaffolding command execution
    #[serde(default)]
    pub setup: SetupConfig,

    /// Deployment stub
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Project record storage
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier (must accept images for screenshot analysis)
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Timeout for one completion call (in seconds)
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// Workspace layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory the scaffolding commands run in
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Name of the generated project (a directory under `output_dir`)
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Base directory for relative screenshot paths
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
}

/// Scaffolding command execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Lines starting with one of these abort the pipeline when they fail
    #[serde(default = "default_fatal_prefixes")]
    pub fatal_prefixes: Vec<String>,

    /// Lines starting with one of these are run through the shell
    #[serde(default = "default_allowed_prefixes")]
    pub allowed_prefixes: Vec<String>,

    /// Timeout for one command (in seconds)
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Shell used to run command lines
    #[serde(default = "default_shell")]
    pub shell: String,
}

/// Deployment stub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Base URL for generated preview links
    #[serde(default = "default_preview_base_url")]
    pub preview_base_url: String,
}

/// Project record storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path (defaults to the local data directory)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_name() -> String {
    "frontend-generation".to_string()
}

fn default_stages() -> Vec<String> {
    Stage::ALL.iter().map(|s| s.name().to_string()).collect()
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.2-11b-vision-preview".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_project_name() -> String {
    "project_root".to_string()
}

fn default_fatal_prefixes() -> Vec<String> {
    vec!["ng new".to_string()]
}

fn default_allowed_prefixes() -> Vec<String> {
    vec!["ng ".to_string(), "npm ".to_string(), "npx ".to_string()]
}

fn default_command_timeout() -> u64 {
    600
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_preview_base_url() -> String {
    "https://preview.example.com".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            project_name: default_project_name(),
            media_dir: None,
        }
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            fatal_prefixes: default_fatal_prefixes(),
            allowed_prefixes: default_allowed_prefixes(),
            command_timeout_secs: default_command_timeout(),
            shell: default_shell(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            preview_base_url: default_preview_base_url(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            stages: default_stages(),
            llm: LlmConfig::default(),
            workspace: WorkspaceConfig::default(),
            setup: SetupConfig::default(),
            deploy: DeployConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Root of the generated project
    pub fn project_dir(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let config: GeneratorConfig = if yaml.trim().is_empty() {
            GeneratorConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            anyhow::bail!("Pipeline '{}' has no stages", self.name);
        }

        // Stage names must be known and unique
        let mut seen = std::collections::HashSet::new();
        for name in &self.stages {
            let stage: Stage = name.parse().map_err(anyhow::Error::msg)?;
            if !seen.insert(stage) {
                anyhow::bail!("Duplicate stage: {}", name);
            }
        }

        let project_name = &self.workspace.project_name;
        if project_name.is_empty()
            || project_name == "."
            || project_name == ".."
            || project_name.contains(['/', '\\'])
        {
            anyhow::bail!("Invalid project name: '{}'", project_name);
        }

        // A fatal line must reach the runner to be able to fail
        let setup = &self.setup;
        for fatal in &setup.fatal_prefixes {
            if !setup.allowed_prefixes.iter().any(|allowed| fatal.starts_with(allowed.as_str())) {
                anyhow::bail!(
                    "Fatal setup prefix '{}' is not covered by any allowed prefix",
                    fatal
                );
            }
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than zero");
        }
        if self.setup.command_timeout_secs == 0 {
            anyhow::bail!("setup.command_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// The configured stages, in order
    pub fn stage_list(&self) -> Result<Vec<Stage>> {
        self.stages
            .iter()
            .map(|name| name.parse::<Stage>().map_err(anyhow::Error::msg))
            .collect()
    }
}
