//! Parsing of provider entity payloads
//!
//! Chat models often wrap the requested JSON in prose or code fences, so the
//! payload is located by its outermost bracket pair before parsing.

use crate::domain::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entity as reported by a provider
///
/// Offsets are whatever the provider claims; they are reconciled against the
/// chunk text before becoming an [`Entity`](crate::redaction::models::Entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntity {
    /// Text the provider says it found
    pub text: String,
    /// Provider category label
    pub category: String,
    /// Provider confidence
    #[serde(default)]
    pub confidence: f32,
    /// Claimed start offset
    #[serde(default, alias = "start_pos", alias = "offset")]
    pub start: usize,
    /// Claimed end offset
    #[serde(default, alias = "end_pos")]
    pub end: usize,
    /// Surrounding context
    #[serde(default)]
    pub context: Option<String>,
    /// Provider's reasoning
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Slice from the first `{` (or `[`) to the last matching closing bracket.
pub fn extract_json_block(content: &str) -> Option<&str> {
    let open = content.find(|c| c == '{' || c == '[')?;
    let close_char = if content[open..].starts_with('{') {
        '}'
    } else {
        ']'
    };
    let close = content.rfind(close_char)?;
    (close > open).then(|| &content[open..=close])
}

/// Parse a provider message into entities.
///
/// Accepts `{"entities": [...]}` or a bare array. An object without an
/// `entities` key yields no entities. Individual malformed entries are skipped;
/// a payload that cannot be located or parsed at all is an error.
pub fn parse_entities(content: &str) -> Result<Vec<ProviderEntity>, ProviderError> {
    let block = extract_json_block(content).ok_or_else(|| {
        ProviderError::InvalidResponse("no JSON payload found in provider response".to_string())
    })?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed JSON payload: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("entities") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ProviderError::InvalidResponse(format!(
                    "'entities' must be an array, got {other}"
                )))
            }
            None => Vec::new(),
        },
        other => {
            return Err(ProviderError::InvalidResponse(format!(
                "unexpected payload type: {other}"
            )))
        }
    };

    let mut entities = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ProviderEntity>(item) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed provider entity");
            }
        }
    }

    Ok(entities)
}
