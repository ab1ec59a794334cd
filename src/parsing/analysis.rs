//! Structured requirements-document analysis parsing

use crate::core::{ApiEndpoint, DocumentAnalysis};
use crate::parsing::code_blocks::extract_code_block;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no JSON object found in response")]
    NoJson,

    #[error("invalid analysis JSON: {0}")]
    InvalidJson(String),
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    ui_components: Value,
    #[serde(default)]
    state_management: Value,
    #[serde(default)]
    api_endpoints: Value,
    #[serde(default)]
    accessibility: Value,
    #[serde(default)]
    styling: Value,
}

/// Locate the JSON payload: a ```json block, else the outermost `{…}` span
fn json_payload(response: &str) -> Option<String> {
    if let Some(block) = extract_code_block(response, &["json"]) {
        return Some(block);
    }
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| response[start..=end].to_string())
}

/// Text fields may come back as strings, lists or objects
fn text_field(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .filter_map(text_field)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn component_names(value: Value) -> Vec<String> {
    let names: Vec<String> = match value {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Object(map) => map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

fn endpoints(value: Value) -> Result<Vec<ApiEndpoint>, AnalysisError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(s
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ApiEndpoint::parse)
            .collect()),
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| AnalysisError::InvalidJson(e.to_string()))
        }
        // {"POST /login": "Authenticates a user", ...}
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(descriptor, detail)| ApiEndpoint {
                description: text_field(detail),
                ..ApiEndpoint::parse(&descriptor)
            })
            .collect()),
        other => Err(AnalysisError::InvalidJson(format!(
            "api_endpoints has unexpected shape: {}",
            other
        ))),
    }
}

/// Parse the model's answer to the document-analysis prompt
pub fn parse_document_analysis(response: &str) -> Result<DocumentAnalysis, AnalysisError> {
    let payload = json_payload(response).ok_or(AnalysisError::NoJson)?;
    let raw: RawAnalysis =
        serde_json::from_str(&payload).map_err(|e| AnalysisError::InvalidJson(e.to_string()))?;

    Ok(DocumentAnalysis {
        ui_components: component_names(raw.ui_components),
        state_management: text_field(raw.state_management),
        api_endpoints: endpoints(raw.api_endpoints)?,
        accessibility: text_field(raw.accessibility),
        styling: text_field(raw.styling),
    })
}
