//! Generate command - create code from a natural language description
//!
//! Retrieves matching examples, assembles a few-shot prompt and asks the
//! configured backend for a `{"code": ...}` reply. Ctrl-C cancels the
//! request in flight.

use anyhow::{Context, Result};
use std::fs;

use exemplar_forge::ai;
use exemplar_forge::config::Config;
use exemplar_forge::{GenerationError, Ranker};

// ANSI color codes from design system
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

mod symbols {
    pub const AI_ICON: &str = "󰌤";
    pub const FILE: &str = "󰈙";
    pub const ERROR: &str = "󰅚";
    pub const SUCCESS: &str = "󰄂";
}

/// Lines shown when printing instead of writing a file
const MAX_PREVIEW_LINES: usize = 50;

pub async fn run(config: Config, description: &str, output: Option<&str>) -> Result<()> {
    let corpus = super::corpus(&config)?;
    let context = super::build_prompt(&config, &Ranker::new(), &corpus, description, &[]);

    print_header(description, output, context.len() / 2);

    let pb = super::spinner("Generating code...".to_string());
    let result = ai::generate(&config, &context, description, super::interrupted()).await;
    pb.finish_and_clear();

    match result {
        Ok(generated) => handle_output(output, &generated.code)?,
        Err(GenerationError::Cancelled) => print_error("Cancelled"),
        Err(e) if e.is_contract_violation() => {
            print_error(&format!("The backend replied in an unexpected shape: {}", e));
        }
        Err(e) => print_error(&format!("Generation failed: {}", e)),
    }

    Ok(())
}

/// Handle the generated code output
fn handle_output(output: Option<&str>, code: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, code).with_context(|| format!("Failed to write to {}", path))?;
            print_file_created(path, code);
        }
        None => print_code_preview(code),
    }
    Ok(())
}

/// Print the header
fn print_header(description: &str, output: Option<&str>, pairs: usize) {
    println!();
    println!(
        "{}{}  {} Code Generator{}",
        colors::PRIMARY, colors::BOLD, symbols::AI_ICON, colors::RESET
    );
    println!(
        "{}  │ Prompt: {}{} example/history pairs{}",
        colors::MUTED, colors::FG, pairs, colors::RESET
    );
    if let Some(out) = output {
        println!(
            "{}  │ Output: {}{}{}",
            colors::MUTED, colors::FG, out, colors::RESET
        );
    }
    println!(
        "{}  ╰ {}{}{}",
        colors::MUTED, colors::DIM, description, colors::RESET
    );
    println!();
}

/// Print code preview (when no output file)
fn print_code_preview(code: &str) {
    println!(
        "{}{}  {} Generated Code {}",
        colors::AI_ACCENT, colors::BOLD, symbols::AI_ICON, colors::RESET
    );
    println!(
        "{}  ╭{}─{}",
        colors::MUTED, "─".repeat(60), colors::RESET
    );

    let lines: Vec<&str> = code.lines().collect();

    for (i, line) in lines.iter().take(MAX_PREVIEW_LINES).enumerate() {
        println!(
            "{}  │ {}{:>4}{} {}{}",
            colors::MUTED,
            colors::DIM,
            i + 1,
            colors::RESET,
            colors::FG,
            line
        );
    }

    if lines.len() > MAX_PREVIEW_LINES {
        println!(
            "{}  │ {}... ({} more lines){}",
            colors::MUTED, colors::DIM, lines.len() - MAX_PREVIEW_LINES, colors::RESET
        );
    }

    println!(
        "{}  ╰{}─{}",
        colors::MUTED, "─".repeat(60), colors::RESET
    );
    println!();
}

/// Print file created message
fn print_file_created(path: &str, code: &str) {
    println!(
        "{}{}  {} File Created {}",
        colors::SUCCESS, colors::BOLD, symbols::SUCCESS, colors::RESET
    );
    println!(
        "{}  │ {} Path: {}{}{}",
        colors::MUTED, symbols::FILE, colors::FG, path, colors::RESET
    );
    println!(
        "{}  │   Lines: {}{}{}",
        colors::MUTED, colors::FG, code.lines().count(), colors::RESET
    );
    println!(
        "{}  ╰   Size: {}{} bytes{}",
        colors::MUTED, colors::FG, code.len(), colors::RESET
    );
    println!();
}

/// Print error message
fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR, symbols::ERROR, message, colors::RESET
    );
}
