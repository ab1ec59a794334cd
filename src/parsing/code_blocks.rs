//! Fenced code block extraction

use crate::core::ComponentFiles;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a response could not be split into component files
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no file names found in response")]
    NoFileNames,

    #[error("no tagged code blocks found in response")]
    NoCodeBlocks,

    #[error("found {files} file names but {blocks} code blocks")]
    CountMismatch { files: usize, blocks: usize },
}

fn file_name_regex() -> &'static Regex {
    static FILE_NAME: OnceLock<Regex> = OnceLock::new();
    FILE_NAME.get_or_init(|| {
        Regex::new(r"\b\w[\w.-]*\.(?:ts|html|scss)\b").expect("Invalid file name regex")
    })
}

fn component_block_regex() -> &'static Regex {
    static COMPONENT_BLOCK: OnceLock<Regex> = OnceLock::new();
    COMPONENT_BLOCK.get_or_init(|| {
        Regex::new(r"```(?:typescript|ts|html|scss)\b[^\S\n]*\n?([\s\S]*?)```")
            .expect("Invalid code block regex")
    })
}

fn any_block_regex() -> &'static Regex {
    static ANY_BLOCK: OnceLock<Regex> = OnceLock::new();
    ANY_BLOCK.get_or_init(|| {
        Regex::new(r"```([\w+#.-]*)[^\S\n]*\n?([\s\S]*?)```").expect("Invalid code block regex")
    })
}

/// Pair every file name in `response` with the fenced block at the same
/// position.
///
/// File names ending in `.ts`, `.html` or `.scss` and blocks tagged
/// `typescript`, `ts`, `html` or `scss` are collected independently in
/// document order. Either list being empty, or the two lengths differing,
/// is an error; no partial pairing is ever returned.
pub fn parse_component_code(response: &str) -> Result<ComponentFiles, ParseError> {
    let file_names: Vec<&str> = file_name_regex()
        .find_iter(response)
        .map(|m| m.as_str())
        .collect();

    let blocks: Vec<&str> = component_block_regex()
        .captures_iter(response)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect();

    if file_names.is_empty() {
        return Err(ParseError::NoFileNames);
    }
    if blocks.is_empty() {
        return Err(ParseError::NoCodeBlocks);
    }
    if file_names.len() != blocks.len() {
        return Err(ParseError::CountMismatch {
            files: file_names.len(),
            blocks: blocks.len(),
        });
    }

    Ok(file_names
        .into_iter()
        .zip(blocks)
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect())
}

/// First fenced block whose tag is one of `tags` (case-insensitive), trimmed
pub fn extract_code_block(response: &str, tags: &[&str]) -> Option<String> {
    any_block_regex().captures_iter(response).find_map(|caps| {
        let tag = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            caps.get(2).map(|m| m.as_str().trim().to_string())
        } else {
            None
        }
    })
}
