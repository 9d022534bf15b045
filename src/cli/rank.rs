//! Rank command - show which examples a request retrieves

use anyhow::{Context, Result};

use exemplar_forge::config::Config;
use exemplar_forge::core::Example;
use exemplar_forge::Ranker;

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;202;40m";       // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
    pub const HIGHLIGHT: &str = "\x1b[38;2;255;183;77m";     // Orange highlight
}

mod symbols {
    pub const SEARCH: &str = "󰍉";
    pub const EXAMPLE: &str = "󰈙";
    pub const MATCH: &str = "󰄬";
}

/// Lines of code shown under each result
const PREVIEW_LINES: usize = 3;

pub fn run(config: Config, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let corpus = super::corpus(&config)?;
    let limit = limit.unwrap_or(config.retrieval.limit);

    let ranked = Ranker::new().rank(query, &corpus, limit);

    if json {
        let out = serde_json::to_string_pretty(&ranked).context("Failed to serialize results")?;
        println!("{}", out);
        return Ok(());
    }

    print_header(query, corpus.len());

    if ranked.is_empty() {
        print_no_results(query);
        return Ok(());
    }

    print_results(&ranked, query);
    Ok(())
}

// ============================================
// UI Functions
// ============================================

fn print_header(query: &str, corpus_size: usize) {
    println!();
    println!(
        "{}{}  {} Example Ranking{}",
        colors::PRIMARY, colors::BOLD, symbols::SEARCH, colors::RESET
    );
    println!(
        "{}  │ Query: {}\"{}\"{}",
        colors::MUTED, colors::HIGHLIGHT, query, colors::RESET
    );
    println!(
        "{}  │ Corpus: {}{} examples{}",
        colors::MUTED, colors::FG, corpus_size, colors::RESET
    );
    println!(
        "{}  ╰{}─{}",
        colors::MUTED, "─".repeat(50), colors::RESET
    );
    println!();
}

fn print_results(results: &[Example], query: &str) {
    println!(
        "{}{}  {} {} examples for \"{}\"{}",
        colors::SUCCESS, colors::BOLD, symbols::MATCH,
        results.len(), query, colors::RESET
    );
    println!();

    for (i, example) in results.iter().enumerate() {
        println!(
            "{}  {}. {} {}{}{}",
            colors::MUTED,
            i + 1,
            symbols::EXAMPLE,
            colors::FG,
            example.description,
            colors::RESET
        );

        let lines: Vec<&str> = example.code.lines().collect();
        for line in lines.iter().take(PREVIEW_LINES) {
            let preview: String = line.chars().take(80).collect();
            println!("{}      {}{}", colors::MUTED, preview, colors::RESET);
        }
        if lines.len() > PREVIEW_LINES {
            println!(
                "{}      ... ({} more lines){}",
                colors::MUTED, lines.len() - PREVIEW_LINES, colors::RESET
            );
        }

        println!();
    }
}

fn print_no_results(query: &str) {
    println!(
        "{}  {} No examples match \"{}\"{}",
        colors::WARNING, symbols::SEARCH, query, colors::RESET
    );
    println!();
    println!(
        "{}  Try:{}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}  • Using different keywords{}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}  • Naming the sketch directly (e.g., 'snake' instead of 'a game with a worm'){}",
        colors::MUTED, colors::RESET
    );
    println!();
}
