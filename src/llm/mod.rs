//! Language-model completion clients

pub mod client;
pub mod image;
pub mod openai;
pub mod response;

use async_trait::async_trait;
pub use client::CompletionClientConfig;
pub use image::{ImageError, ImageFormat, ImageInput};
pub use openai::OpenAiCompatibleClient;
pub use response::{Completion, CompletionError, TokenUsage};

/// A single prompt, optionally accompanied by an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub image: Option<ImageInput>,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(prompt: impl Into<String>, image: ImageInput) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image),
        }
    }
}

/// Trait for completion providers - allows for different implementations
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and return the full response text
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}
