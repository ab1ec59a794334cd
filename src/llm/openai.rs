//! OpenAI-compatible chat-completions client

use crate::llm::{
    client::CompletionClientConfig, Completion, CompletionClient, CompletionError,
    CompletionRequest, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the JSON body for one request
pub fn build_request_body(
    config: &CompletionClientConfig,
    request: &CompletionRequest,
) -> serde_json::Result<serde_json::Value> {
    let content = match &request.image {
        Some(image) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: request.prompt.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            },
        ]),
        None => MessageContent::Text(request.prompt.clone()),
    };

    serde_json::to_value(ChatRequest {
        model: &config.model,
        messages: vec![Message {
            role: "user",
            content,
        }],
        temperature: config.temperature,
        stream: false,
    })
}

/// Extract the first choice from a successful response body
pub fn parse_response(body: &str) -> Result<Completion, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("{}: {}", e, body)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            CompletionError::MalformedResponse("response contained no choices".to_string())
        })?;

    Ok(Completion {
        content,
        usage: parsed.usage,
    })
}

/// Map a non-success status to an error
fn status_error(status: u16, body: String) -> CompletionError {
    match status {
        401 | 403 => CompletionError::Unauthorized(body),
        429 => CompletionError::RateLimited(body),
        _ => CompletionError::Api {
            status,
            message: body,
        },
    }
}

/// Completion client for any `/chat/completions` endpoint (Groq, OpenAI,
/// vLLM, Ollama in OpenAI mode)
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    config: CompletionClientConfig,
    http: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: CompletionClientConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &CompletionClientConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        let body = build_request_body(&self.config, request)
            .map_err(|e| CompletionError::Internal(format!("Failed to encode request: {}", e)))?;

        debug!(
            "POST {} (model {}, prompt {} chars, image: {})",
            self.config.completions_url(),
            self.config.model,
            request.prompt.len(),
            request.image.is_some()
        );

        let mut builder = self.http.post(self.config.completions_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout(self.config.timeout_secs)
            } else {
                CompletionError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("Completion request failed with status {}", status);
            return Err(status_error(status.as_u16(), text));
        }

        let completion = parse_response(&text)?;
        if let Some(usage) = &completion.usage {
            debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
        Ok(completion)
    }
}
