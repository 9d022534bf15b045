//! Prompt command - show the assembled prompt for a request
//!
//! Nothing is sent to a backend; this shows what would be.

use anyhow::{Context, Result};

use exemplar_forge::config::Config;
use exemplar_forge::{PromptMessage, PromptRole, Ranker};

mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

const PREVIEW_CHARS: usize = 72;

pub fn run(mut config: Config, request: &str, budget: Option<usize>, json: bool) -> Result<()> {
    if let Some(budget) = budget {
        config.prompt.size_budget_chars = budget;
    }

    let corpus = super::corpus(&config)?;
    let messages = super::build_prompt(&config, &Ranker::new(), &corpus, request, &[]);

    if json {
        let out = serde_json::to_string_pretty(&messages).context("Failed to serialize prompt")?;
        println!("{}", out);
        return Ok(());
    }

    print_prompt(&messages, request, config.prompt.size_budget_chars);
    Ok(())
}

fn print_prompt(messages: &[PromptMessage], request: &str, budget: usize) {
    let used: usize = messages.iter().map(PromptMessage::size).sum();
    let pairs = messages
        .iter()
        .filter(|m| m.role == PromptRole::User)
        .count();

    println!();
    println!(
        "{}{}  Prompt for \"{}\"{}",
        colors::PRIMARY, colors::BOLD, request, colors::RESET
    );
    println!(
        "{}  │ {} messages, {} pairs, {} / {} chars{}",
        colors::MUTED, messages.len(), pairs, used, budget, colors::RESET
    );
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);

    for message in messages {
        let (label, color) = match message.role {
            PromptRole::System => ("system", colors::PRIMARY),
            PromptRole::User => ("user", colors::FG),
            PromptRole::Assistant => ("assistant", colors::AI_ACCENT),
        };
        let flat = message.content.replace('\n', " ");
        let preview: String = flat.chars().take(PREVIEW_CHARS).collect();
        let ellipsis = if flat.chars().count() > PREVIEW_CHARS { "..." } else { "" };

        println!(
            "{}  {:<9}{} {}{}{}",
            color, label, colors::RESET, preview, ellipsis, colors::RESET
        );
    }
    println!();
}
