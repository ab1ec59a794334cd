//! Pipeline state and run status models

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Generated files of one component (file name -> content)
pub type ComponentFiles = IndexMap<String, String>;

/// Overall status of one driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Run is in progress
    Running,
    /// Every stage ran and none recorded an error
    Completed,
    /// Every stage ran but some recorded errors
    CompletedWithErrors,
    /// A stage requested a hard stop
    Halted,
}

impl ExecutionStatus {
    /// Parse the textual form stored by persistence backends
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Running" => Some(ExecutionStatus::Running),
            "Completed" => Some(ExecutionStatus::Completed),
            "CompletedWithErrors" => Some(ExecutionStatus::CompletedWithErrors),
            "Halted" => Some(ExecutionStatus::Halted),
            _ => None,
        }
    }
}

/// Output of the vision stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotAnalysis {
    /// Free-text description of components, design language and layout
    pub description: String,
}

/// One API endpoint extracted from the requirements document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEndpoint {
    /// HTTP method, when the document names one
    pub method: Option<String>,

    /// Request path, e.g. `/api/auth/login`
    pub path: String,

    /// Optional free-text description
    pub description: Option<String>,
}

impl ApiEndpoint {
    /// Parse a descriptor such as `POST /api/login` or `/users`
    pub fn parse(descriptor: &str) -> Self {
        let descriptor = descriptor.trim();
        let mut parts = descriptor.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or_default();
        let rest = parts.next().map(str::trim).unwrap_or_default();

        let is_method = !first.is_empty()
            && !rest.is_empty()
            && first.chars().all(|c| c.is_ascii_alphabetic());

        if is_method {
            ApiEndpoint {
                method: Some(first.to_ascii_uppercase()),
                path: rest.to_string(),
                description: None,
            }
        } else {
            ApiEndpoint {
                method: None,
                path: descriptor.to_string(),
                description: None,
            }
        }
    }

    /// Key used in `api_services`
    pub fn key(&self) -> String {
        match &self.method {
            Some(method) => format!("{} {}", method, self.path),
            None => self.path.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for ApiEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Descriptor(String),
            Object {
                #[serde(default)]
                method: Option<String>,
                #[serde(alias = "endpoint", alias = "url")]
                path: String,
                #[serde(default, alias = "response", alias = "details")]
                description: Option<serde_json::Value>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Descriptor(descriptor) => ApiEndpoint::parse(&descriptor),
            Raw::Object {
                method,
                path,
                description,
            } => {
                let parsed = ApiEndpoint::parse(&path);
                ApiEndpoint {
                    method: method
                        .map(|m| m.trim().to_ascii_uppercase())
                        .filter(|m| !m.is_empty())
                        .or(parsed.method),
                    path: parsed.path,
                    description: description.map(|value| match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    }),
                }
            }
        })
    }
}

/// Output of the requirements-document analysis stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Component names requested for generation
    pub ui_components: Vec<String>,

    /// State-management approach (e.g. NgRx)
    pub state_management: Option<String>,

    /// API endpoints named by the document
    pub api_endpoints: Vec<ApiEndpoint>,

    /// Accessibility requirements
    pub accessibility: Option<String>,

    /// Styling and branding guidelines
    pub styling: Option<String>,
}

/// The single mutable record threaded through every stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Screenshot reference (local path or URL)
    pub screenshot_url: String,

    /// Requirements document text
    pub document_text: String,

    /// Written by `analyze_screenshot`
    #[serde(default)]
    pub screenshot_analysis: Option<ScreenshotAnalysis>,

    /// Written by `analyze_document`
    #[serde(default)]
    pub document_analysis: Option<DocumentAnalysis>,

    /// Written by `generate_setup`
    #[serde(default)]
    pub setup_commands: Option<String>,

    /// Written by `generate_components`; never shrinks
    #[serde(default)]
    pub ui_components: IndexMap<String, ComponentFiles>,

    /// Written by `generate_components`; same key set as `ui_components`
    #[serde(default)]
    pub ui_dependencies: IndexMap<String, Vec<String>>,

    /// Written by `analyze_document`
    #[serde(default)]
    pub api_endpoints: Vec<ApiEndpoint>,

    /// Written by `generate_api_services` (endpoint key -> code)
    #[serde(default)]
    pub api_services: IndexMap<String, String>,

    /// Written by `generate_tests` (component -> test code)
    #[serde(default)]
    pub ui_tests: IndexMap<String, String>,

    /// Written by `generate_container_file`
    #[serde(default)]
    pub container_file_content: Option<String>,

    /// Written by `validate`
    #[serde(default)]
    pub validation_report: Option<String>,

    /// Written by `generate_documentation` (relative path -> markdown)
    #[serde(default)]
    pub documentation: IndexMap<String, String>,

    /// Written by `deploy`
    #[serde(default)]
    pub preview_link: Option<String>,

    /// Append-only failure notes
    #[serde(default)]
    pub errors: Vec<String>,

    /// Number of driver runs over this state
    #[serde(default)]
    pub iteration_count: u32,
}

impl PipelineState {
    /// Create a fresh state for one submission
    pub fn new(screenshot_url: impl Into<String>, document_text: impl Into<String>) -> Self {
        Self {
            screenshot_url: screenshot_url.into(),
            document_text: document_text.into(),
            ..Self::default()
        }
    }

    /// Append a failure note attributed to a stage
    pub fn record_error(&mut self, stage: &str, message: impl AsRef<str>) {
        self.errors.push(format!("[{}] {}", stage, message.as_ref()));
    }

    /// Component names requested by the document analysis, if any
    pub fn requested_components(&self) -> &[String] {
        self.document_analysis
            .as_ref()
            .map(|a| a.ui_components.as_slice())
            .unwrap_or_default()
    }

    /// Load a snapshot written by [`PipelineState::save`]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the state as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
