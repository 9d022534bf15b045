//! CLI command implementations

pub mod chat;
pub mod generate;
pub mod info;
pub mod prompt;
pub mod rank;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use exemplar_forge::ai::PromptAssembler;
use exemplar_forge::config::Config;
use exemplar_forge::core::{builtin_corpus, load_corpus, ConversationMessage, Example};
use exemplar_forge::{PromptMessage, Ranker};

/// Load the configured corpus, or the bundled one
pub fn corpus(config: &Config) -> Result<Vec<Example>> {
    match &config.retrieval.corpus_path {
        Some(path) => load_corpus(path).with_context(|| format!("Failed to load corpus {:?}", path)),
        None => Ok(builtin_corpus()),
    }
}

/// Assembler configured from the `[prompt]` section
pub fn assembler(config: &Config) -> PromptAssembler {
    PromptAssembler::new(config.prompt.size_budget_chars)
        .with_history_pairs(config.prompt.history_pairs)
}

/// Rank examples for `request` and assemble the prompt around them
pub fn build_prompt(
    config: &Config,
    ranker: &Ranker,
    corpus: &[Example],
    request: &str,
    transcript: &[ConversationMessage],
) -> Vec<PromptMessage> {
    let ranked = ranker.rank(request, corpus, config.retrieval.limit);
    assembler(config).assemble(config.prompt.system_prompt(), &ranked, transcript)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Create a styled spinner for a backend call, hidden when nobody is watching
pub fn spinner(message: String) -> ProgressBar {
    if !console::user_attended() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();

    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.yellow} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]);
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));

    pb
}
