//! Prompt assembly within a size budget
//!
//! Packs a system instruction, ranked few-shot examples and recent accepted
//! turns into an ordered list of role-tagged messages:
//!
//! 1. the system message (always present, never trimmed)
//! 2. example (user, assistant) pairs in ranked order
//! 3. history (user, assistant) pairs, oldest to most recent
//!
//! The budget is a character count standing in for a backend token quota.
//! Examples are trimmed first, then history. Pairs are never split.

use serde::{Deserialize, Serialize};

use crate::core::{history_pairs, ConversationMessage, Example};

/// Accepted turns replayed when no window is configured
pub const DEFAULT_HISTORY_PAIRS: usize = 3;

/// Default character budget for an assembled prompt
pub const DEFAULT_SIZE_BUDGET_CHARS: usize = 12_000;

/// Instruction sent when the configuration does not override it
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert creative coding assistant.

Turn each request into a complete, runnable p5.js sketch.

Guidelines:
- Write complete, working code (not pseudocode)
- Keep everything in a single sketch with setup() and draw()
- Prefer clear names and short helper functions

Output Format:
- Reply with a JSON object that has exactly one string field named "code"
- Do not add explanations or Markdown outside the JSON object"#;

/// Role of an assembled prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// A single assembled prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }

    /// Size counted against the budget
    pub fn size(&self) -> usize {
        self.content.chars().count()
    }
}

/// Serialize code the way the backend is expected to answer
pub fn code_object(code: &str) -> String {
    serde_json::json!({ "code": code }).to_string()
}

/// A demonstration or history turn, kept or dropped as a unit
#[derive(Debug, Clone)]
struct PromptPair {
    request: PromptMessage,
    response: PromptMessage,
}

impl PromptPair {
    fn new(request: &str, code: &str) -> Self {
        Self {
            request: PromptMessage::user(request),
            response: PromptMessage::assistant(code_object(code)),
        }
    }

    fn size(&self) -> usize {
        self.request.size() + self.response.size()
    }
}

fn total_size(pairs: &[PromptPair]) -> usize {
    pairs.iter().map(PromptPair::size).sum()
}

/// Prompt assembler with a fixed budget and history window
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    size_budget_chars: usize,
    history_pairs: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_BUDGET_CHARS)
    }
}

impl PromptAssembler {
    pub fn new(size_budget_chars: usize) -> Self {
        Self {
            size_budget_chars,
            history_pairs: DEFAULT_HISTORY_PAIRS,
        }
    }

    /// Replay at most `pairs` accepted turns
    pub fn with_history_pairs(mut self, pairs: usize) -> Self {
        self.history_pairs = pairs;
        self
    }

    pub fn size_budget_chars(&self) -> usize {
        self.size_budget_chars
    }

    /// Build the prompt for one request
    pub fn assemble(
        &self,
        system_prompt: &str,
        ranked_examples: &[Example],
        history: &[ConversationMessage],
    ) -> Vec<PromptMessage> {
        let system = PromptMessage::system(system_prompt);
        let budget = self.size_budget_chars;

        let examples: Vec<PromptPair> = ranked_examples
            .iter()
            .filter(|e| e.is_complete())
            .map(|e| PromptPair::new(&e.description, &e.code))
            .collect();

        let mut turns: Vec<PromptPair> = history_pairs(history, self.history_pairs)
            .iter()
            .map(|pair| PromptPair::new(&pair.request, &pair.response))
            .collect();
        let mut turns_size = total_size(&turns);

        let mut running = system.size();
        let mut kept = 0;
        for pair in &examples {
            if running + pair.size() + turns_size > budget {
                break;
            }
            running += pair.size();
            kept += 1;
        }

        if running + turns_size > budget && turns.len() > 1 {
            turns = turns.split_off(turns.len() - 1);
            turns_size = total_size(&turns);
        }
        if running + turns_size > budget {
            turns.clear();
            turns_size = 0;
        }

        tracing::debug!(
            "Assembled prompt: {} of {} examples, {} history pairs, {} of {} chars",
            kept,
            examples.len(),
            turns.len(),
            running + turns_size,
            budget
        );

        let mut messages = Vec::with_capacity(1 + 2 * (kept + turns.len()));
        messages.push(system);
        for pair in examples.into_iter().take(kept).chain(turns) {
            messages.push(pair.request);
            messages.push(pair.response);
        }
        messages
    }
}

/// Assemble a prompt with the default history window
pub fn assemble(
    system_prompt: &str,
    ranked_examples: &[Example],
    history: &[ConversationMessage],
    size_budget_chars: usize,
) -> Vec<PromptMessage> {
    PromptAssembler::new(size_budget_chars).assemble(system_prompt, ranked_examples, history)
}
