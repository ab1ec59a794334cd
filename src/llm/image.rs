//! Image inputs for vision completions

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors while loading a screenshot
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Screenshot reference is empty")]
    EmptyReference,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Screenshot {0} is empty")]
    EmptyImage(String),
}

/// Declared format of an encoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// MIME type for data URLs
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Guess from a file name or URL path; JPEG when unknown
    pub fn from_reference(reference: &str) -> Self {
        let path = reference.split(['?', '#']).next().unwrap_or(reference);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => ImageFormat::Png,
            Some("gif") => ImageFormat::Gif,
            Some("webp") => ImageFormat::Webp,
            _ => ImageFormat::Jpeg,
        }
    }

    /// Parse a `Content-Type` header value
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.split(';').next().unwrap_or_default().trim();
        match mime {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }
}

/// Base64-encoded image bytes plus their declared format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub data_base64: String,
    pub format: ImageFormat,
}

impl ImageInput {
    /// Encode raw bytes
    pub fn from_bytes(bytes: &[u8], format: ImageFormat) -> Self {
        Self {
            data_base64: BASE64.encode(bytes),
            format,
        }
    }

    /// `data:` URL accepted by OpenAI-compatible vision models
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.data_base64
        )
    }

    /// Load a screenshot from a local path (relative paths resolve against
    /// `media_dir` when given) or an `http(s)` URL
    pub async fn load(reference: &str, media_dir: Option<&Path>) -> Result<Self, ImageError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageError::EmptyReference);
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Self::fetch(reference).await;
        }

        let path = match media_dir {
            Some(dir) if Path::new(reference).is_relative() => dir.join(reference),
            _ => PathBuf::from(reference),
        };

        let bytes = tokio::fs::read(&path).await.map_err(|source| ImageError::Read {
            path: path.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ImageError::EmptyImage(path.display().to_string()));
        }

        debug!("Loaded screenshot {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(&bytes, ImageFormat::from_reference(reference)))
    }

    async fn fetch(url: &str) -> Result<Self, ImageError> {
        let fetch_error = |message: String| ImageError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = reqwest::get(url)
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(ImageFormat::from_mime)
            .unwrap_or_else(|| ImageFormat::from_reference(url));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageError::EmptyImage(url.to_string()));
        }

        debug!("Fetched screenshot {} ({} bytes)", url, bytes.len());
        Ok(Self::from_bytes(&bytes, format))
    }
}
