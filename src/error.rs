//! Typed errors surfaced by the library
//!
//! Ranking and prompt assembly never fail. Only corpus loading and the
//! backend call layer produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading a corpus file
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse corpus {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single generation request
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend could not be reached or the connection dropped
    #[error("{provider} request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{provider} error ({status}): {message}")]
    Backend {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The backend answered, but not with a `{"code": "..."}` object
    #[error("backend response is missing a string `code` field: {0}")]
    ContractViolation(String),

    /// No usable backend is configured
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    #[error("generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// True when the backend replied but broke the response contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, GenerationError::ContractViolation(_))
    }
}
