//! Ollama Client - Local AI model support
//!
//! Runs generation against a local Ollama server. No API key needed.
//! Requests ask for JSON output so replies follow the `code` contract.

use serde::{Deserialize, Serialize};

use super::context::{PromptMessage, PromptRole};
use crate::error::GenerationError;

/// Default Ollama server URL
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model for code-related tasks
pub const DEFAULT_MODEL: &str = "codellama";

const PROVIDER: &str = "Ollama";

/// Request for chat completion
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ModelOptions>,
}

/// Chat message
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Model options
#[derive(Debug, Serialize)]
struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

/// Chat response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    message: Message,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama Client for local AI inference
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    temperature: Option<f32>,
}

impl OllamaClient {
    /// Create a new client with a specific model against the default URL
    pub fn with_model(model: &str) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 min for local inference
            .build()
            .map_err(|source| GenerationError::Network {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.to_string(),
            client,
            temperature: None,
        })
    }

    /// Set the base URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Get the current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if Ollama is running
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    /// Send the assembled prompt followed by `user_turn`, returning the reply text
    pub async fn complete(
        &self,
        context: &[PromptMessage],
        user_turn: &str,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = self.build_request(context, user_turn);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| GenerationError::Network {
                provider: PROVIDER,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend {
                provider: PROVIDER,
                status: status.as_u16(),
                message: body,
            });
        }

        let chat_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|source| GenerationError::Network {
                    provider: PROVIDER,
                    source,
                })?;

        tracing::debug!(
            "Ollama ({}) produced {:?} tokens",
            chat_response.model,
            chat_response.eval_count
        );

        Ok(chat_response.message.content)
    }

    fn build_request(&self, context: &[PromptMessage], user_turn: &str) -> ChatRequest {
        let mut messages: Vec<Message> = context
            .iter()
            .map(|m| Message {
                role: role_name(m.role).to_string(),
                content: m.content.clone(),
            })
            .collect();

        messages.push(Message {
            role: "user".to_string(),
            content: user_turn.to_string(),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            format: "json",
            options: Some(ModelOptions {
                temperature: self.temperature,
                num_predict: Some(4096),
            }),
        }
    }
}

fn role_name(role: PromptRole) -> &'static str {
    match role {
        PromptRole::System => "system",
        PromptRole::User => "user",
        PromptRole::Assistant => "assistant",
    }
}
