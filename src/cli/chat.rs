//! Interactive chat command
//!
//! Each turn retrieves examples for the request, replays recent accepted
//! turns as history and asks the backend for code. The transcript lives in
//! memory for the session only.

use anyhow::Result;
use console::Term;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;

use exemplar_forge::ai;
use exemplar_forge::config::Config;
use exemplar_forge::core::{ConversationMessage, ConversationRole};
use exemplar_forge::{GenerationError, Ranker};

// ANSI color codes from design system
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    // Design system colors
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

// Unicode symbols
mod symbols {
    pub const AI_ICON: &str = "󰌤";
    pub const USER_ICON: &str = ">";
    pub const SUCCESS: &str = "󰄂";
    pub const ERROR: &str = "󰅚";
    pub const DIVIDER: &str = "─";
}

/// Print a horizontal divider
fn print_divider() {
    println!(
        "{}{}{}",
        colors::MUTED,
        symbols::DIVIDER.repeat(55),
        colors::RESET
    );
}

/// Print generated code bubble
fn print_code_message(code: &str) {
    println!();
    println!(
        "{}{}  {} Sketch {}{}",
        colors::AI_ACCENT, colors::BOLD, symbols::AI_ICON, colors::RESET, colors::MUTED
    );
    for line in code.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!("{}  ╰{}─{}", colors::MUTED, symbols::DIVIDER.repeat(50), colors::RESET);
}

/// Print error message
fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR, symbols::ERROR, message, colors::RESET
    );
}

/// Print success message
fn print_success(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::SUCCESS, symbols::SUCCESS, message, colors::RESET
    );
}

/// Print help information
fn print_help() {
    println!();
    println!(
        "{}{}  Available Commands:{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!(
        "{}  /help{}    - Show this help message",
        colors::FG, colors::MUTED
    );
    println!(
        "{}  /clear{}   - Clear conversation history",
        colors::FG, colors::MUTED
    );
    println!(
        "{}  /history{} - Show accepted turns replayed as context",
        colors::FG, colors::MUTED
    );
    println!(
        "{}  /exit{}    - Exit the chat",
        colors::FG, colors::MUTED
    );
    println!();
    println!(
        "{}  Ctrl-C cancels a request that is still running, or exits at the prompt.{}",
        colors::MUTED, colors::RESET
    );
    println!();
}

fn print_prompt() {
    print!(
        "\n{}  {} {}",
        colors::PRIMARY, symbols::USER_ICON, colors::RESET
    );
    io::stdout().flush().ok();
}

/// Blocking line reader on its own thread
///
/// A line is read only when asked for, so the prompt and the previous
/// reply are never interleaved. The thread is not joined; it dies with
/// the process.
struct LineReader {
    requests: std_mpsc::Sender<()>,
    lines: mpsc::UnboundedReceiver<String>,
}

impl LineReader {
    fn spawn<R>(mut source: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (requests, pending) = std_mpsc::channel::<()>();
        let (sender, lines) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            for () in pending {
                let mut line = String::new();
                match source.read_line(&mut line) {
                    Ok(0) | Err(_) => break, // EOF
                    Ok(_) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { requests, lines }
    }

    /// Next line, or `None` at end of input
    async fn next_line(&mut self) -> Option<String> {
        self.requests.send(()).ok()?;
        self.lines.recv().await
    }
}

/// Read one request, or `None` when input ends or `interrupt` resolves first
async fn read_request<F>(reader: &mut LineReader, interrupt: F) -> Option<String>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => None,
        line = reader.next_line() => line.map(|l| l.trim().to_string()),
    }
}

/// Main chat loop
pub async fn run(config: Config) -> Result<()> {
    let corpus = super::corpus(&config)?;
    let ranker = Ranker::new();
    let mut transcript: Vec<ConversationMessage> = Vec::new();
    let mut reader = LineReader::spawn(io::BufReader::new(io::stdin()));

    print_banner(corpus.len());

    loop {
        print_prompt();
        let input = match read_request(&mut reader, super::interrupted()).await {
            Some(i) if i.is_empty() => continue,
            Some(i) => i,
            None => {
                println!();
                break;
            }
        };

        // Handle commands
        if let Some(should_break) = handle_command(&input, &mut transcript, &config) {
            if should_break {
                break;
            }
            continue;
        }

        let context = super::build_prompt(&config, &ranker, &corpus, &input, &transcript);
        transcript.push(ConversationMessage::user(&input));

        let pb = super::spinner("Generating sketch...".to_string());
        let result = ai::generate(&config, &context, &input, super::interrupted()).await;
        pb.finish_and_clear();

        match result {
            Ok(generated) => {
                print_code_message(&generated.code);
                transcript.push(ConversationMessage::system(generated.code));
            }
            Err(e) => {
                let message = match &e {
                    GenerationError::Cancelled => "Request cancelled".to_string(),
                    e if e.is_contract_violation() => {
                        format!("The backend replied in an unexpected shape: {}", e)
                    }
                    e => format!("AI error: {}", e),
                };
                print_error(&message);
                transcript.push(ConversationMessage::error(message));
            }
        }
    }

    println!();
    Ok(())
}

/// Handle slash commands
fn handle_command(
    input: &str,
    transcript: &mut Vec<ConversationMessage>,
    config: &Config,
) -> Option<bool> {
    if !input.starts_with('/') {
        return None;
    }

    match input.to_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => {
            print_success("Goodbye! Happy sketching!");
            Some(true)
        }
        "/help" | "/h" | "/?" => {
            print_help();
            Some(false)
        }
        "/clear" | "/c" => {
            transcript.clear();
            Term::stdout().clear_screen().ok();
            print_success("Conversation cleared");
            Some(false)
        }
        "/history" => {
            print_history(transcript, config.prompt.history_pairs);
            Some(false)
        }
        _ => {
            print_error(&format!("Unknown command: {}", input));
            println!("{}  Type /help for available commands{}", colors::MUTED, colors::RESET);
            Some(false)
        }
    }
}

fn print_history(transcript: &[ConversationMessage], max_pairs: usize) {
    let pairs = exemplar_forge::core::history_pairs(transcript, max_pairs);
    let failed = transcript
        .iter()
        .filter(|m| m.role == ConversationRole::Error)
        .count();

    println!();
    println!(
        "{}  {} accepted turns in context, {} failed turns skipped{}",
        colors::MUTED, pairs.len(), failed, colors::RESET
    );
    for pair in pairs {
        println!("{}  • {}{}", colors::FG, pair.request, colors::RESET);
    }
}

/// Print banner with corpus info
fn print_banner(corpus_size: usize) {
    println!();
    println!(
        "{}{}╭─────────────────────────────────────────────────────╮{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!(
        "{}│{}  {} Exemplar Forge v{:<33}{}│{}",
        colors::PRIMARY,
        colors::AI_ACCENT,
        symbols::AI_ICON,
        env!("CARGO_PKG_VERSION"),
        colors::PRIMARY,
        colors::RESET
    );
    println!(
        "{}│{}  {:>4} examples loaded{:<31}{}│{}",
        colors::PRIMARY,
        colors::MUTED,
        corpus_size,
        "",
        colors::PRIMARY,
        colors::RESET
    );
    println!(
        "{}╰─────────────────────────────────────────────────────╯{}",
        colors::PRIMARY, colors::RESET
    );
    println!();
    println!(
        "{}  Commands: /help, /clear, /history, /exit{}",
        colors::MUTED, colors::RESET
    );
    print_divider();
}
