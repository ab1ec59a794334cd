//! Requirements-document text extraction

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported document format: .{0} (expected .txt, .md or .markdown)")]
    UnsupportedFormat(String),

    #[error("Document {0} is not valid UTF-8")]
    NotUtf8(PathBuf),

    #[error("Document {0} is empty")]
    Empty(PathBuf),
}

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text"];

/// Read the text of a requirements document
pub async fn extract_text(path: &Path) -> Result<String, DocumentError> {
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        let extension = extension.to_ascii_lowercase();
        if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentError::UnsupportedFormat(extension));
        }
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8(path.to_path_buf()))?;

    if text.trim().is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }

    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}
