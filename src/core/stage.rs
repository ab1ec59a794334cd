//! Stage identifiers and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named step of the generation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AnalyzeScreenshot,
    AnalyzeDocument,
    GenerateSetup,
    ExecuteSetup,
    GenerateComponents,
    GenerateApiServices,
    GenerateTests,
    GenerateContainerFile,
    Validate,
    GenerateDocumentation,
    PersistFiles,
    Deploy,
}

impl Stage {
    /// Every stage, in default pipeline order
    pub const ALL: [Stage; 12] = [
        Stage::AnalyzeScreenshot,
        Stage::AnalyzeDocument,
        Stage::GenerateSetup,
        Stage::ExecuteSetup,
        Stage::GenerateComponents,
        Stage::GenerateApiServices,
        Stage::GenerateTests,
        Stage::GenerateContainerFile,
        Stage::Validate,
        Stage::GenerateDocumentation,
        Stage::PersistFiles,
        Stage::Deploy,
    ];

    /// Stable name used in configuration, logs and error notes
    pub fn name(&self) -> &'static str {
        match self {
            Stage::AnalyzeScreenshot => "analyze_screenshot",
            Stage::AnalyzeDocument => "analyze_document",
            Stage::GenerateSetup => "generate_setup",
            Stage::ExecuteSetup => "execute_setup",
            Stage::GenerateComponents => "generate_components",
            Stage::GenerateApiServices => "generate_api_services",
            Stage::GenerateTests => "generate_tests",
            Stage::GenerateContainerFile => "generate_container_file",
            Stage::Validate => "validate",
            Stage::GenerateDocumentation => "generate_documentation",
            Stage::PersistFiles => "persist_files",
            Stage::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name() == s.trim())
            .ok_or_else(|| format!("Unknown stage: {}", s))
    }
}

/// What the driver should do after a stage returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Move on to the next stage (errors, if any, are in the state)
    Continue,
    /// Stop the run and return the state as-is
    Halt { reason: String },
}

impl StageOutcome {
    pub fn halt(reason: impl Into<String>) -> Self {
        StageOutcome::Halt {
            reason: reason.into(),
        }
    }
}
