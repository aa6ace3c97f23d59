//! Provider-backed PII detector
//!
//! Wraps an [`EntityRecognitionProvider`] and turns its loosely-specified
//! output into offset-accurate entities. Providers frequently report offsets
//! that are char-based, off by a few positions, or missing entirely, so each
//! returned span is reconciled against the chunk before it is trusted.

use super::{Detection, EntityDetector};
use crate::adapters::provider::{
    EntityRecognitionProvider, ProviderEntity, RecognitionRequest,
};
use crate::domain::Result;
use crate::redaction::models::{DetectionMethod, Entity, PiiCategory};
use async_trait::async_trait;
use std::sync::Arc;

/// Provider-backed PII detector
#[derive(Clone)]
pub struct ProviderDetector {
    provider: Arc<dyn EntityRecognitionProvider>,
    categories: Vec<PiiCategory>,
    confidence_threshold: f32,
}

impl ProviderDetector {
    /// Create a detector over a provider
    pub fn new(
        provider: Arc<dyn EntityRecognitionProvider>,
        categories: Vec<PiiCategory>,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            provider,
            categories,
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
        }
    }

    /// Convert one provider entity into a chunk-relative entity.
    ///
    /// Returns `None` for disabled categories and for spans that cannot be
    /// located in `text`.
    fn reconcile(&self, text: &str, found: ProviderEntity) -> Option<Entity> {
        let category = PiiCategory::parse(&found.category);
        if !category.is_enabled_by(&self.categories) {
            tracing::debug!(category = %category, "Dropping provider entity outside enabled categories");
            return None;
        }

        if found.text.is_empty() {
            tracing::warn!(category = %category, "Dropping provider entity with empty text");
            return None;
        }

        let Some((start, end)) = locate_span(text, &found.text, found.start, found.end) else {
            tracing::warn!(
                category = %category,
                claimed_start = found.start,
                claimed_end = found.end,
                "Provider entity text not found in chunk, discarding"
            );
            return None;
        };

        Some(
            Entity::new(&text[start..end], category, start, end, DetectionMethod::Provider)
                .with_confidence(found.confidence)
                .with_context(found.context)
                .with_reasoning(found.reasoning),
        )
    }
}

/// Find the byte span of `needle` in `text` given a provider's claimed offsets.
///
/// Tried in order: the offsets as byte offsets, the offsets as char offsets,
/// then the literal occurrence nearest the claimed start.
pub fn locate_span(text: &str, needle: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }

    if start < end && text.get(start..end) == Some(needle) {
        return Some((start, end));
    }

    if start < end {
        if let (Some(byte_start), Some(byte_end)) =
            (char_to_byte(text, start), char_to_byte(text, end))
        {
            if text.get(byte_start..byte_end) == Some(needle) {
                return Some((byte_start, byte_end));
            }
        }
    }

    text.match_indices(needle)
        .map(|(index, _)| index)
        .min_by_key(|index| index.abs_diff(start))
        .map(|index| (index, index + needle.len()))
}

fn char_to_byte(text: &str, char_index: usize) -> Option<usize> {
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(char_index)
}

#[async_trait]
impl EntityDetector for ProviderDetector {
    async fn detect(&self, text: &str) -> Result<Detection> {
        let request = RecognitionRequest {
            text,
            categories: &self.categories,
            confidence_threshold: self.confidence_threshold,
        };

        let response = self.provider.recognize(&request).await?;
        let reported = response.entities.len();

        let entities: Vec<Entity> = response
            .entities
            .into_iter()
            .filter_map(|found| self.reconcile(text, found))
            .collect();

        tracing::debug!(
            provider = self.provider.name(),
            reported = reported,
            accepted = entities.len(),
            "Provider detection complete"
        );

        Ok(Detection {
            entities,
            usage: response.usage,
        })
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::provider::{RecognitionResponse, TokenUsage};
    use crate::domain::ProviderError;

    struct FixedProvider {
        entities: Vec<ProviderEntity>,
    }

    #[async_trait]
    impl EntityRecognitionProvider for FixedProvider {
        async fn recognize(
            &self,
            _request: &RecognitionRequest<'_>,
        ) -> Result<RecognitionResponse> {
            Ok(RecognitionResponse {
                entities: self.entities.clone(),
                usage: TokenUsage::single(120, 30),
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EntityRecognitionProvider for FailingProvider {
        async fn recognize(
            &self,
            _request: &RecognitionRequest<'_>,
        ) -> Result<RecognitionResponse> {
            Err(ProviderError::Timeout("60s".to_string()).into())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn found(text: &str, category: &str, start: usize, end: usize) -> ProviderEntity {
        ProviderEntity {
            text: text.to_string(),
            category: category.to_string(),
            confidence: 0.97,
            start,
            end,
            context: None,
            reasoning: Some("looks like PII".to_string()),
        }
    }

    #[test]
    fn test_locate_exact_byte_offsets() {
        let text = "Contact John Smith today";
        assert_eq!(locate_span(text, "John Smith", 8, 18), Some((8, 18)));
    }

    #[test]
    fn test_locate_char_offsets() {
        // "Zoë" is 4 bytes but 3 chars; the provider counted chars
        let text = "Zoë called 555-123-4567";
        assert_eq!(locate_span(text, "555-123-4567", 11, 23), Some((12, 24)));
    }

    #[test]
    fn test_locate_nearest_occurrence() {
        let text = "a@b.io wrote to a@b.io";
        // claimed offsets are wrong but closer to the second occurrence
        assert_eq!(locate_span(text, "a@b.io", 14, 15), Some((16, 22)));
        assert_eq!(locate_span(text, "a@b.io", 0, 0), Some((0, 6)));
    }

    #[test]
    fn test_locate_missing_text() {
        assert_eq!(locate_span("nothing here", "John Smith", 0, 10), None);
        assert_eq!(locate_span("nothing here", "", 0, 0), None);
    }

    #[tokio::test]
    async fn test_detect_reconciles_and_filters_categories() {
        let text = "Contact John Smith at john@example.com";
        let provider = FixedProvider {
            entities: vec![
                found("John Smith", "Person", 8, 18),
                found("john@example.com", "Email", 0, 0),
                found("Jane Roe", "Person", 0, 8),
                found("Contact", "Organization", 0, 7),
            ],
        };
        let detector = ProviderDetector::new(
            Arc::new(provider),
            vec![PiiCategory::Name, PiiCategory::Email],
            0.8,
        );

        let detection = detector.detect(text).await.unwrap();

        assert_eq!(detection.entities.len(), 2);
        assert_eq!(detection.entities[0].category, PiiCategory::Name);
        assert_eq!(detection.entities[1].start, 22);
        assert_eq!(&text[detection.entities[1].start..detection.entities[1].end], "john@example.com");
        assert_eq!(detection.entities[0].detection_method, DetectionMethod::Provider);
        assert_eq!(detection.usage, TokenUsage::single(120, 30));
    }

    #[tokio::test]
    async fn test_detect_propagates_provider_failure() {
        let detector = ProviderDetector::new(Arc::new(FailingProvider), Vec::new(), 0.8);
        assert!(detector.detect("anything").await.is_err());
        assert_eq!(detector.name(), "failing");
    }
}
