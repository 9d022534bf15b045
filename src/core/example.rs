//! Few-shot examples

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single (description, code) demonstration
///
/// Missing, null or non-string fields in a corpus record deserialize to
/// empty strings, so the rest of the crate never branches on optional text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
}

/// Accept any JSON value, keeping only strings
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

impl Example {
    pub fn new(description: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: code.into(),
        }
    }

    /// Identity used for de-duplication
    pub fn identity(&self) -> (&str, &str) {
        (&self.description, &self.code)
    }

    /// Both fields carry text, so the example can be shown to a backend
    pub fn is_complete(&self) -> bool {
        !self.description.is_empty() && !self.code.is_empty()
    }
}
