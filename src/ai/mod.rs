//! Prompt assembly and generation backends

pub mod claude;
pub mod context;
pub mod ollama;
pub mod response;
pub mod router;

pub use claude::ClaudeClient;
pub use context::{assemble, PromptAssembler, PromptMessage, PromptRole};
pub use ollama::OllamaClient;
pub use response::{parse_code_response, GeneratedCode};
pub use router::{generate, Backend, Provider};
