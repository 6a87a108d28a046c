//! OpenAI-compatible chat-completions invoker.
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! (LM Studio, llama.cpp server, vLLM, Ollama's OpenAI shim). Requests ask
//! for `stream: true`; servers that ignore it and answer with a plain JSON
//! body are handled too.

use super::sse::{SseEvent, SseLineBuffer};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::ports::model_invoker::{ChunkSink, InvokerError, ModelInvoker};
use council_domain::{Participant, PromptMessage};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Used for participants without a model of their own
    pub default_model: String,
    pub max_tokens: u64,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&FileProviderConfig> for OpenAiCompatConfig {
    fn from(config: &FileProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key(),
            default_model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u64,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

// ==================== Health ====================

const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// What `GET {base_url}/models` reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHealth {
    pub models: Vec<String>,
    /// Whether the configured default model is among `models`
    pub default_model_listed: bool,
}

// ==================== Invoker ====================

pub struct OpenAiCompatInvoker {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatInvoker {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, InvokerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InvokerError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Probe the server's model listing.
    ///
    /// Any answer other than a 2xx model list is an error; an unreachable
    /// server maps to [`InvokerError::Connection`].
    pub async fn check_health(&self) -> Result<ProviderHealth, InvokerError> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let mut request = self.client.get(&url).timeout(HEALTH_TIMEOUT);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(InvokerError::RequestFailed(format!("HTTP {} from {}", status, url)));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let list: ModelList = serde_json::from_str(&body)
            .map_err(|e| InvokerError::InvalidResponse(format!("Unexpected model list: {}", e)))?;
        let models: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        let default_model_listed = models.iter().any(|m| *m == self.config.default_model);
        debug!(url = %url, models = models.len(), default_model_listed, "Provider is reachable");
        Ok(ProviderHealth {
            models,
            default_model_listed,
        })
    }

    fn model_for<'a>(&'a self, participant: &'a Participant) -> &'a str {
        if participant.model.trim().is_empty() {
            &self.config.default_model
        } else {
            &participant.model
        }
    }

    fn request<'a>(
        &'a self,
        model: &'a str,
        history: &'a [PromptMessage],
        system_prompt: &'a str,
        stream: bool,
    ) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.extend(history.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));
        ChatRequest {
            model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream,
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, InvokerError> {
        let mut request = self.client.post(self.endpoint()).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InvokerError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                text.chars().take(300).collect::<String>()
            )));
        }
        Ok(response)
    }

    /// Read an SSE body, forwarding every content delta.
    ///
    /// Returns the text received so far and, when the stream broke off,
    /// the error that ended it.
    async fn read_stream(
        response: reqwest::Response,
        on_chunk: ChunkSink<'_>,
    ) -> (String, Option<InvokerError>) {
        let mut text = String::new();
        let mut lines = SseLineBuffer::default();
        let mut stream = response.bytes_stream();

        let forward = |event: SseEvent, text: &mut String| -> bool {
            match event {
                SseEvent::Done => true,
                SseEvent::Data(payload) => {
                    match serde_json::from_str::<ChatChunk>(&payload) {
                        Ok(chunk) => {
                            for delta in chunk.choices.into_iter().filter_map(|c| c.delta.content) {
                                if !delta.is_empty() {
                                    on_chunk(&delta);
                                    text.push_str(&delta);
                                }
                            }
                        }
                        Err(e) => debug!(error = %e, "Skipping unparsable stream chunk"),
                    }
                    false
                }
            }
        };

        while let Some(next) = stream.next().await {
            match next {
                Ok(bytes) => {
                    for event in lines.push(&bytes) {
                        if forward(event, &mut text) {
                            return (text, None);
                        }
                    }
                }
                Err(e) => return (text, Some(map_reqwest_error(e))),
            }
        }
        if let Some(event) = lines.finish() {
            forward(event, &mut text);
        }
        (text, None)
    }

    async fn complete_once(
        &self,
        model: &str,
        history: &[PromptMessage],
        system_prompt: &str,
        on_chunk: ChunkSink<'_>,
    ) -> Result<String, InvokerError> {
        let response = self
            .send(&self.request(model, history, system_prompt, false))
            .await?;
        let text = completion_text(response).await?;
        on_chunk(&text);
        Ok(text)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> InvokerError {
    if e.is_timeout() {
        InvokerError::Timeout
    } else if e.is_connect() {
        InvokerError::Connection(e.to_string())
    } else {
        InvokerError::RequestFailed(e.to_string())
    }
}

fn is_event_stream(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"))
}

async fn completion_text(response: reqwest::Response) -> Result<String, InvokerError> {
    let body = response.text().await.map_err(map_reqwest_error)?;
    let completion: ChatCompletion = serde_json::from_str(&body)
        .map_err(|e| InvokerError::InvalidResponse(format!("Unexpected completion body: {}", e)))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| InvokerError::InvalidResponse("Completion has no content".to_string()))
}

#[async_trait]
impl ModelInvoker for OpenAiCompatInvoker {
    async fn invoke(
        &self,
        participant: &Participant,
        history: &[PromptMessage],
        system_prompt: &str,
        on_chunk: ChunkSink<'_>,
    ) -> Result<String, InvokerError> {
        let model = self.model_for(participant);
        debug!(participant = %participant.name, model, messages = history.len(), "Invoking model");

        let response = self
            .send(&self.request(model, history, system_prompt, true))
            .await?;

        if !is_event_stream(&response) {
            // The server ignored `stream: true`
            let text = completion_text(response).await?;
            on_chunk(&text);
            return Ok(text);
        }

        let (text, error) = Self::read_stream(response, on_chunk).await;
        match error {
            None if !text.is_empty() => Ok(text),
            None => Err(InvokerError::InvalidResponse(
                "Stream ended without content".to_string(),
            )),
            Some(e) if text.is_empty() => {
                warn!(participant = %participant.name, error = %e, "Stream failed, retrying without streaming");
                self.complete_once(model, history, system_prompt, on_chunk).await
            }
            Some(e) => {
                warn!(
                    participant = %participant.name,
                    error = %e,
                    received = text.len(),
                    "Stream broke off, keeping partial response"
                );
                Ok(text)
            }
        }
    }
}
