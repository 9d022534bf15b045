//! Conversation transcript entries and history pairing
//!
//! The transcript belongs to the caller. This module only reads it to pick
//! out accepted (request, response) turns for the prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    /// A request typed by the user
    User,
    /// An accepted response carrying generated code
    System,
    /// A failed turn, shown to the user but never replayed
    Error,
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub role: ConversationRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(role: ConversationRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ConversationRole::User, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(ConversationRole::System, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ConversationRole::Error, text)
    }
}

/// One accepted turn: the request and the code that answered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPair {
    pub request: String,
    pub response: String,
}

/// Collect the most recent `max_pairs` accepted turns, oldest first
///
/// A turn is a `user` entry immediately followed by a `system` entry.
/// Orphaned user entries and `error` entries are skipped.
pub fn history_pairs(transcript: &[ConversationMessage], max_pairs: usize) -> Vec<HistoryPair> {
    let mut pairs = Vec::new();
    let mut i = 0;

    while i + 1 < transcript.len() {
        let (current, next) = (&transcript[i], &transcript[i + 1]);
        if current.role == ConversationRole::User && next.role == ConversationRole::System {
            pairs.push(HistoryPair {
                request: current.text.clone(),
                response: next.text.clone(),
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    let skip = pairs.len().saturating_sub(max_pairs);
    pairs.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_and_orphan_turns_are_skipped() {
        let transcript = vec![
            ConversationMessage::user("A"),
            ConversationMessage::system("B"),
            ConversationMessage::user("C"),
            ConversationMessage::error("D"),
        ];

        let pairs = history_pairs(&transcript, 5);
        assert_eq!(
            pairs,
            vec![HistoryPair {
                request: "A".to_string(),
                response: "B".to_string(),
            }]
        );
    }

    #[test]
    fn test_keeps_most_recent_pairs_in_order() {
        let transcript: Vec<_> = (0..4)
            .flat_map(|i| {
                [
                    ConversationMessage::user(format!("ask {}", i)),
                    ConversationMessage::system(format!("code {}", i)),
                ]
            })
            .collect();

        let pairs = history_pairs(&transcript, 2);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].request, "ask 2");
        assert_eq!(pairs[1].request, "ask 3");
    }

    #[test]
    fn test_system_entry_without_request_is_ignored() {
        let transcript = vec![
            ConversationMessage::system("stray"),
            ConversationMessage::user("retry"),
            ConversationMessage::user("A"),
            ConversationMessage::system("B"),
        ];

        let pairs = history_pairs(&transcript, 3);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].request, "A");
    }

    #[test]
    fn test_zero_window_yields_nothing() {
        let transcript = vec![ConversationMessage::user("A"), ConversationMessage::system("B")];
        assert!(history_pairs(&transcript, 0).is_empty());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ConversationMessage::error("boom");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"role\":\"error\""));
    }
}
