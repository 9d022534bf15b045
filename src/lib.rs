//! Exemplar Forge - few-shot example retrieval and prompt budgeting
//!
//! Ranks a fixed corpus of (description, code) examples against a request
//! and packs the best of them, together with recent conversation turns,
//! into a size-bounded prompt for a code generation backend.

pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod index;

pub use crate::ai::context::{assemble, PromptAssembler, PromptMessage, PromptRole};
pub use crate::core::{ConversationMessage, ConversationRole, Example};
pub use crate::error::{CorpusError, GenerationError};
pub use crate::index::{rank, Ranker, DEFAULT_LIMIT};
