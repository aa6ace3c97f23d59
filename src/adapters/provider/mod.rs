//! Entity recognition provider integration
//!
//! A provider receives one chunk of text plus the enabled categories and the
//! confidence threshold, and returns candidate entities with chunk-relative
//! offsets. The core only depends on [`EntityRecognitionProvider`]; the Azure
//! OpenAI implementation is one transport behind it.

pub mod azure_openai;
pub mod prompt;
pub mod response;

use crate::domain::Result;
use crate::redaction::models::PiiCategory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use azure_openai::AzureOpenAiProvider;
pub use response::{extract_json_block, parse_entities, ProviderEntity};

/// Token usage reported by one or more provider calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens sent
    pub input_tokens: u64,
    /// Completion tokens received
    pub output_tokens: u64,
    /// Number of successful provider requests
    pub requests: u64,
}

impl TokenUsage {
    /// Usage of a single successful request
    pub fn single(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            requests: 1,
        }
    }

    /// Add another usage record into this one
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.requests += other.requests;
    }
}

/// One recognition call
#[derive(Debug, Clone, Copy)]
pub struct RecognitionRequest<'a> {
    /// Chunk text to analyse
    pub text: &'a str,
    /// Categories the provider should look for
    pub categories: &'a [PiiCategory],
    /// Minimum confidence the caller will keep
    pub confidence_threshold: f32,
}

/// Provider output for one chunk
#[derive(Debug, Clone, Default)]
pub struct RecognitionResponse {
    /// Candidate entities, offsets relative to the request text
    pub entities: Vec<ProviderEntity>,
    /// Token usage of the call
    pub usage: TokenUsage,
}

/// Trait for entity recognition providers
///
/// Implementations own their transport concerns (timeouts, retries, auth).
/// A returned error means the chunk produced no usable detections.
#[async_trait]
pub trait EntityRecognitionProvider: Send + Sync {
    /// Recognize PII entities in one chunk
    async fn recognize(&self, request: &RecognitionRequest<'_>) -> Result<RecognitionResponse>;

    /// Provider name used in logs and telemetry
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_add() {
        let mut usage = TokenUsage::default();
        usage.add(TokenUsage::single(1200, 80));
        usage.add(TokenUsage::single(800, 20));

        assert_eq!(usage.input_tokens, 2000);
        assert_eq!(usage.output_tokens, 100);
        assert_eq!(usage.requests, 2);
    }
}
