//! Hybrid detector: several detectors over the same chunk

use super::{Detection, EntityDetector};
use crate::domain::{RadactError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

/// Runs every inner detector on the chunk and concatenates their candidates.
///
/// A failing inner detector is logged and skipped. The chunk only fails if
/// every inner detector failed.
#[derive(Clone)]
pub struct HybridDetector {
    detectors: Vec<Arc<dyn EntityDetector>>,
}

impl HybridDetector {
    /// Create a hybrid over `detectors`
    pub fn new(detectors: Vec<Arc<dyn EntityDetector>>) -> Self {
        Self { detectors }
    }

    /// Number of inner detectors
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Whether there are no inner detectors
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

#[async_trait]
impl EntityDetector for HybridDetector {
    async fn detect(&self, text: &str) -> Result<Detection> {
        let results = join_all(self.detectors.iter().map(|d| d.detect(text))).await;

        let mut combined = Detection::default();
        let mut last_error: Option<RadactError> = None;
        let mut succeeded = 0usize;

        for (detector, result) in self.detectors.iter().zip(results) {
            match result {
                Ok(detection) => {
                    succeeded += 1;
                    combined.entities.extend(detection.entities);
                    combined.usage.add(detection.usage);
                }
                Err(e) => {
                    tracing::warn!(
                        detector = detector.name(),
                        error = %e,
                        "Inner detector failed, continuing with remaining detectors"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(combined),
        }
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::provider::TokenUsage;
    use crate::domain::ProviderError;
    use crate::redaction::detector::PatternDetector;
    use crate::redaction::models::{DetectionMethod, Entity, PiiCategory};

    struct StaticDetector(Vec<Entity>);

    #[async_trait]
    impl EntityDetector for StaticDetector {
        async fn detect(&self, _text: &str) -> Result<Detection> {
            Ok(Detection {
                entities: self.0.clone(),
                usage: TokenUsage::single(10, 2),
            })
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    struct BrokenDetector;

    #[async_trait]
    impl EntityDetector for BrokenDetector {
        async fn detect(&self, _text: &str) -> Result<Detection> {
            Err(ProviderError::ConnectionFailed("refused".to_string()).into())
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_concatenates_all_detectors() {
        let text = "Reach Jane Doe on 555-123-4567";
        let provider_like = StaticDetector(vec![Entity::new(
            "Jane Doe",
            PiiCategory::Name,
            6,
            14,
            DetectionMethod::Provider,
        )]);
        let hybrid = HybridDetector::new(vec![
            Arc::new(provider_like),
            Arc::new(PatternDetector::new().unwrap()),
        ]);

        let detection = hybrid.detect(text).await.unwrap();

        assert!(detection
            .entities
            .iter()
            .any(|e| e.detection_method == DetectionMethod::Provider));
        assert!(detection
            .entities
            .iter()
            .any(|e| e.category == PiiCategory::Phone));
        assert_eq!(detection.usage.requests, 1);
    }

    #[tokio::test]
    async fn test_failing_detector_is_skipped() {
        let hybrid = HybridDetector::new(vec![
            Arc::new(BrokenDetector),
            Arc::new(PatternDetector::new().unwrap()),
        ]);

        let detection = hybrid.detect("SSN 123-45-6789").await.unwrap();
        assert!(detection
            .entities
            .iter()
            .any(|e| e.category == PiiCategory::Ssn));
        assert_eq!(detection.usage.requests, 0);
    }

    #[tokio::test]
    async fn test_all_detectors_failing_is_an_error() {
        let hybrid = HybridDetector::new(vec![Arc::new(BrokenDetector), Arc::new(BrokenDetector)]);
        assert!(hybrid.detect("SSN 123-45-6789").await.is_err());
        assert_eq!(hybrid.len(), 2);
    }
}
