//! Pipeline definition - a fixed, ordered list of stages

use crate::core::{config::GeneratorConfig, stage::Stage};
use anyhow::Result;

/// An ordered list of stages under a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Stages, in execution order
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Create a pipeline from configuration
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline {
            name: config.name.clone(),
            stages: config.stage_list()?,
        })
    }

    /// Render the stage sequence as a Mermaid flowchart
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("flowchart TD\n");
        out.push_str("    start([start])\n");

        let mut previous = "start".to_string();
        for stage in &self.stages {
            out.push_str(&format!("    {}[{}]\n", stage.name(), stage.name()));
            out.push_str(&format!("    {} --> {}\n", previous, stage.name()));
            previous = stage.name().to_string();
        }

        out.push_str("    finish([end])\n");
        out.push_str(&format!("    {} --> finish\n", previous));
        out
    }
}
