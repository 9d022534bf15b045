//! Info command - show version, corpus and provider status

use anyhow::Result;

use exemplar_forge::ai::router::{select_provider, Provider};
use exemplar_forge::ai::OllamaClient;
use exemplar_forge::config::{self, Config};

pub async fn run(config: &Config) -> Result<()> {
    println!("Exemplar Forge v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    println!();
    println!("Configuration:");
    println!("  Config file: {}", config_file());

    println!();
    println!("Corpus:");
    match &config.retrieval.corpus_path {
        Some(path) => println!("  Source: {}", path.display()),
        None => println!("  Source: bundled"),
    }
    let corpus = super::corpus(config)?;
    println!("  Examples: {}", corpus.len());
    println!("  Retrieved per request: {}", config.retrieval.limit);
    println!("  Prompt budget: {} chars", config.prompt.size_budget_chars);
    println!("  History window: {} turns", config.prompt.history_pairs);

    println!();
    println!("AI Providers:");
    if let Some(claude) = &config.ai.providers.claude {
        check_provider(&claude.api_key_env, "Claude");
    }
    if let Some(local) = &config.ai.providers.local {
        let status = if !local.enabled {
            "disabled"
        } else if local_server_up(&local.model, local.endpoint.as_deref()).await {
            "running"
        } else {
            "not running"
        };
        println!("  Ollama ({}): {}", local.model, status);
    }

    let active = select_provider(config, |var| std::env::var(var).is_ok());
    println!(
        "  Active: {}",
        match active {
            Some(Provider::Claude) => "Claude",
            Some(Provider::Local) => "Ollama",
            None => "none",
        }
    );

    Ok(())
}

fn config_file() -> String {
    config::config_path()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

async fn local_server_up(model: &str, endpoint: Option<&str>) -> bool {
    let Ok(client) = OllamaClient::with_model(model) else {
        return false;
    };
    let client = match endpoint {
        Some(url) => client.with_url(url),
        None => client,
    };
    client.is_available().await
}

fn check_provider(env_var: &str, name: &str) {
    let status = if std::env::var(env_var).is_ok() {
        "configured"
    } else {
        "not configured"
    };
    println!("  {}: {}", name, status);
}
