//! Backend response contract
//!
//! A backend must answer with a JSON object holding a single string field
//! named `code`. Anything else is a contract violation, reported separately
//! from network failures so callers can say so explicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;

/// Code returned by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
}

/// Validate a raw backend reply and extract its `code` field
pub fn parse_code_response(text: &str) -> Result<GeneratedCode, GenerationError> {
    let body = strip_code_fence(text);

    let value: Value = serde_json::from_str(body).map_err(|e| {
        GenerationError::ContractViolation(format!("response is not a JSON object ({})", e))
    })?;

    match value.get("code") {
        Some(Value::String(code)) => Ok(GeneratedCode { code: code.clone() }),
        Some(other) => Err(GenerationError::ContractViolation(format!(
            "`code` must be a string, got {}",
            json_type(other)
        ))),
        None => Err(GenerationError::ContractViolation(
            "no `code` field in response".to_string(),
        )),
    }
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        // Skip the language tag line, then cut at the closing fence
        if let Some(first_newline) = trimmed.find('\n') {
            let rest = &trimmed[first_newline + 1..];
            if let Some(end_pos) = rest.rfind("```") {
                return rest[..end_pos].trim();
            }
        }
    }

    trimmed
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        let parsed = parse_code_response(r#"{"code": "circle(1, 2, 3);"}"#).unwrap();
        assert_eq!(parsed.code, "circle(1, 2, 3);");
    }

    #[test]
    fn test_fenced_object() {
        let reply = "```json\n{\"code\": \"noLoop();\"}\n```";
        assert_eq!(parse_code_response(reply).unwrap().code, "noLoop();");
    }

    #[test]
    fn test_missing_code_field() {
        let err = parse_code_response(r#"{"sketch": "x"}"#).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_non_string_code_field() {
        let err = parse_code_response(r#"{"code": 42}"#).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_prose_reply() {
        let err = parse_code_response("Sure! Here is your sketch.").unwrap_err();
        assert!(err.is_contract_violation());
    }
}
