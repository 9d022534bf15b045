//! Claude API client
//!
//! Sends an assembled few-shot prompt plus one live request to the
//! Anthropic Messages API. One client per request; nothing is kept between
//! calls.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::context::{PromptMessage, PromptRole};
use crate::error::GenerationError;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const PROVIDER: &str = "Claude";

/// Claude API Client
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

/// Message role in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Request body for Claude API
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response from Claude API
#[derive(Debug, Deserialize)]
pub struct ClaudeResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

/// Error response from Claude API
#[derive(Debug, Deserialize)]
struct ClaudeError {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl ClaudeClient {
    /// Create a new Claude client
    pub fn new(api_key: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| GenerationError::Network {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        })
    }

    /// Create client from the named environment variable
    pub fn from_env(api_key_env: &str) -> Result<Self, GenerationError> {
        let api_key = std::env::var(api_key_env).map_err(|_| {
            GenerationError::NotConfigured(format!("{} environment variable not set", api_key_env))
        })?;
        Self::new(api_key)
    }

    /// Set the model to use
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set max tokens for response
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the assembled prompt followed by `user_turn`, returning the reply text
    pub async fn complete(
        &self,
        context: &[PromptMessage],
        user_turn: &str,
    ) -> Result<String, GenerationError> {
        let request = self.build_request(context, user_turn);

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|source| GenerationError::Network {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ClaudeError>(&error_text) {
                Ok(claude_error) => format!(
                    "{}: {}",
                    claude_error.error.error_type, claude_error.error.message
                ),
                Err(_) => error_text,
            };

            return Err(GenerationError::Backend {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let claude_response: ClaudeResponse =
            response
                .json()
                .await
                .map_err(|source| GenerationError::Network {
                    provider: PROVIDER,
                    source,
                })?;

        tracing::debug!(
            "Claude ({}) stopped: {:?}",
            claude_response.model,
            claude_response.stop_reason
        );

        // Extract text from content blocks
        Ok(claude_response
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<&str>>()
            .join(""))
    }

    /// Split the prompt into Claude's `system` field and alternating messages
    fn build_request(&self, context: &[PromptMessage], user_turn: &str) -> ClaudeRequest {
        let system: Vec<&str> = context
            .iter()
            .filter(|m| m.role == PromptRole::System)
            .map(|m| m.content.as_str())
            .collect();

        let mut messages: Vec<Message> = context
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    PromptRole::User => Role::User,
                    PromptRole::Assistant => Role::Assistant,
                    PromptRole::System => return None,
                };
                Some(Message {
                    role,
                    content: m.content.clone(),
                })
            })
            .collect();

        messages.push(Message {
            role: Role::User,
            content: user_turn.to_string(),
        });

        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages,
            system: if system.is_empty() {
                None
            } else {
                Some(system.join("\n\n"))
            },
            temperature: self.temperature,
        }
    }
}
