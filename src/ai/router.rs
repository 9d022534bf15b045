//! Backend routing
//!
//! Picks the generation backend from configuration and runs one request
//! against it. A backend lives only for the request that created it.

use std::future::Future;

use super::claude::ClaudeClient;
use super::context::PromptMessage;
use super::ollama::OllamaClient;
use super::response::{parse_code_response, GeneratedCode};
use crate::config::Config;
use crate::error::GenerationError;

/// Which backend a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Claude,
    Local,
}

/// Select the provider for a request
///
/// Claude is used when it is the default provider and its API key is set.
/// Otherwise the local model is used if enabled, and Claude is the last
/// resort when the local model is disabled.
pub fn select_provider(config: &Config, has_key: impl Fn(&str) -> bool) -> Option<Provider> {
    let providers = &config.ai.providers;
    let claude_ready = providers
        .claude
        .as_ref()
        .map(|c| has_key(c.api_key_env.as_str()))
        .unwrap_or(false);
    let local_ready = providers.local.as_ref().map(|l| l.enabled).unwrap_or(false);

    if config.ai.default_provider == "claude" && claude_ready {
        return Some(Provider::Claude);
    }
    if local_ready {
        if config.ai.default_provider == "claude" {
            tracing::warn!("Claude API key not set, falling back to local model");
        }
        return Some(Provider::Local);
    }
    if claude_ready {
        return Some(Provider::Claude);
    }
    None
}

/// A configured generation backend
pub enum Backend {
    Claude(ClaudeClient),
    Local(OllamaClient),
}

impl Backend {
    /// Build a fresh backend for one request
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let provider = select_provider(config, |var| std::env::var(var).is_ok()).ok_or_else(|| {
            GenerationError::NotConfigured(
                "set ANTHROPIC_API_KEY or enable [ai.providers.local]".to_string(),
            )
        })?;

        match (provider, &config.ai.providers.claude, &config.ai.providers.local) {
            (Provider::Claude, Some(claude), _) => {
                let client = ClaudeClient::from_env(&claude.api_key_env)?
                    .with_model(&claude.model)
                    .with_temperature(claude.temperature);
                let client = match claude.max_tokens {
                    Some(max_tokens) => client.with_max_tokens(max_tokens),
                    None => client,
                };
                Ok(Backend::Claude(client))
            }
            (Provider::Local, _, Some(local)) => {
                let mut client =
                    OllamaClient::with_model(&local.model)?.with_temperature(local.temperature);
                if let Some(endpoint) = &local.endpoint {
                    client = client.with_url(endpoint);
                }
                Ok(Backend::Local(client))
            }
            _ => Err(GenerationError::NotConfigured(format!(
                "{:?} provider has no settings",
                provider
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Claude(_) => "Claude",
            Backend::Local(_) => "Ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Backend::Claude(client) => client.model(),
            Backend::Local(client) => client.model(),
        }
    }

    /// Send the prompt and validate the reply against the `code` contract
    pub async fn generate(
        &self,
        context: &[PromptMessage],
        user_turn: &str,
    ) -> Result<GeneratedCode, GenerationError> {
        tracing::info!("Using provider: {} ({})", self.name(), self.model());

        let text = match self {
            Backend::Claude(client) => client.complete(context, user_turn).await?,
            Backend::Local(client) => client.complete(context, user_turn).await?,
        };

        parse_code_response(&text)
    }
}

/// Run one generation request, abandoning it when `cancel` resolves
pub async fn generate<F>(
    config: &Config,
    context: &[PromptMessage],
    user_turn: &str,
    cancel: F,
) -> Result<GeneratedCode, GenerationError>
where
    F: Future<Output = ()>,
{
    let backend = Backend::from_config(config)?;

    tokio::select! {
        biased;
        _ = cancel => Err(GenerationError::Cancelled),
        result = backend.generate(context, user_turn) => result,
    }
}
