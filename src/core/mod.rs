//! Core data model shared by retrieval and prompt assembly

pub mod cache;
pub mod conversation;
pub mod corpus;
pub mod example;

pub use cache::IndexCache;
pub use conversation::{history_pairs, ConversationMessage, ConversationRole, HistoryPair};
pub use corpus::{builtin_corpus, load_corpus};
pub use example::Example;
