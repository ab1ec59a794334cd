//! Completion client configuration

use crate::core::config::LlmConfig;

/// Configuration for the HTTP completion client
#[derive(Debug, Clone)]
pub struct CompletionClientConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Bearer token
    pub api_key: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,
}

impl Default for CompletionClientConfig {
    fn default() -> Self {
        Self::from_llm_config(&LlmConfig::default())
    }
}

impl CompletionClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `llm` section of the generator configuration,
    /// reading the API key from the configured environment variable
    pub fn from_llm_config(llm: &LlmConfig) -> Self {
        Self {
            endpoint: llm.endpoint.clone(),
            model: llm.model.clone(),
            api_key: std::env::var(&llm.api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            temperature: llm.temperature,
            timeout_secs: llm.timeout_secs,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full URL of the chat-completions route
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}
