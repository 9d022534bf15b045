//! Configuration management for Exemplar Forge

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::context::{DEFAULT_HISTORY_PAIRS, DEFAULT_SIZE_BUDGET_CHARS, DEFAULT_SYSTEM_PROMPT};
use crate::index::DEFAULT_LIMIT;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub retrieval: RetrievalConfig,
    pub prompt: PromptConfig,
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub default_provider: String,
    pub providers: AiProviders,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiProviders {
    pub claude: Option<ProviderConfig>,
    pub local: Option<LocalProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key_env: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalProviderConfig {
    pub enabled: bool,
    pub model: String,
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// JSON corpus file; the bundled corpus is used when unset
    pub corpus_path: Option<PathBuf>,
    /// Examples retrieved per request
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Character ceiling for an assembled prompt
    pub size_budget_chars: usize,
    /// Accepted turns replayed as history
    pub history_pairs: usize,
    pub system_prompt: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: "claude".to_string(),
            providers: AiProviders::default(),
        }
    }
}

impl Default for AiProviders {
    fn default() -> Self {
        Self {
            claude: Some(ProviderConfig {
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                model: crate::ai::claude::DEFAULT_MODEL.to_string(),
                max_tokens: Some(4096),
                temperature: Some(0.7),
            }),
            local: Some(LocalProviderConfig {
                enabled: true,
                model: crate::ai::ollama::DEFAULT_MODEL.to_string(),
                endpoint: Some(crate::ai::ollama::DEFAULT_OLLAMA_URL.to_string()),
                temperature: Some(0.7),
            }),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            size_budget_chars: DEFAULT_SIZE_BUDGET_CHARS,
            history_pairs: DEFAULT_HISTORY_PAIRS,
            system_prompt: None,
        }
    }
}

impl PromptConfig {
    /// The configured system prompt, or the built-in one
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("com", "exemplar", "forge")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        PathBuf::from(p)
    } else {
        config_path()?
    };

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Initialize configuration file with defaults
pub fn init_config() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    // Create directory if needed
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    // Write default config
    let default_config = Config::default();
    let content = toml::to_string_pretty(&default_config)
        .context("Failed to serialize default config")?;

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Configuration initialized at {:?}", path);
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.retrieval.limit, 12);
        assert_eq!(config.prompt.history_pairs, DEFAULT_HISTORY_PAIRS);
        assert_eq!(config.prompt.system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.ai.default_provider, "claude");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [prompt]
            size_budget_chars = 4000
            system_prompt = "Only Processing sketches."
            "#,
        )
        .unwrap();

        assert_eq!(config.prompt.size_budget_chars, 4000);
        assert_eq!(config.prompt.history_pairs, DEFAULT_HISTORY_PAIRS);
        assert_eq!(config.prompt.system_prompt(), "Only Processing sketches.");
        assert_eq!(config.retrieval.limit, DEFAULT_LIMIT);
        assert!(config.ai.providers.claude.is_some());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.prompt.size_budget_chars, DEFAULT_SIZE_BUDGET_CHARS);
        assert_eq!(
            parsed.ai.providers.local.map(|l| l.model),
            Some(crate::ai::ollama::DEFAULT_MODEL.to_string())
        );
    }

    #[test]
    fn test_load_config_reads_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retrieval]\nlimit = 4\ncorpus_path = \"sketches.json\"\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.retrieval.limit, 4);
        assert_eq!(config.retrieval.corpus_path, Some(PathBuf::from("sketches.json")));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.retrieval.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prompt\nbroken").unwrap();
        assert!(load_config(path.to_str()).is_err());
    }
}
