//! Pattern-based PII detector

use super::patterns::{PatternKind, PatternRegistry};
use super::{Detection, EntityDetector};
use crate::domain::Result;
use crate::redaction::models::{DetectionMethod, Entity, PiiCategory};
use async_trait::async_trait;
use std::sync::Arc;

/// Pattern-based PII detector
///
/// Runs every enabled pattern of the registry over the text, in library
/// order. Overlapping matches from different patterns are all reported.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
    categories: Vec<PiiCategory>,
}

impl PatternDetector {
    /// Create a new pattern detector with the built-in library
    pub fn new() -> anyhow::Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new pattern detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            categories: Vec::new(),
        }
    }

    /// Restrict detection to `categories` (empty enables all)
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<PiiCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Pattern registry in use
    pub fn registry(&self) -> &PatternRegistry {
        &self.pattern_registry
    }

    /// Detect PII in a string
    pub fn detect_in_text(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if !pattern.category.is_enabled_by(&self.categories) {
                continue;
            }

            let method = match pattern.kind {
                PatternKind::Plain => DetectionMethod::Pattern,
                PatternKind::Contextual => DetectionMethod::ContextualPattern,
            };

            for captures in pattern.regex.captures_iter(text) {
                let captures = match captures {
                    Ok(captures) => captures,
                    Err(e) => {
                        // backtrack limit hit; keep what this pattern found so far
                        tracing::warn!(
                            pattern = %pattern.name,
                            error = %e,
                            "Pattern evaluation aborted"
                        );
                        break;
                    }
                };

                let Some(matched) = captures.get(pattern.group) else {
                    continue;
                };
                if matched.start() == matched.end() {
                    continue;
                }

                entities.push(
                    Entity::new(
                        matched.as_str(),
                        pattern.category.clone(),
                        matched.start(),
                        matched.end(),
                        method,
                    )
                    .with_confidence(pattern.confidence),
                );
            }
        }

        entities
    }
}

#[async_trait]
impl EntityDetector for PatternDetector {
    async fn detect(&self, text: &str) -> Result<Detection> {
        Ok(Detection::local(self.detect_in_text(text)))
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(entities: &'a [Entity], category: &PiiCategory) -> Vec<&'a str> {
        entities
            .iter()
            .filter(|e| &e.category == category)
            .map(|e| e.text.as_str())
            .collect()
    }

    #[test]
    fn test_detect_contact_details() {
        let detector = PatternDetector::new().unwrap();
        let entities = detector
            .detect_in_text("Contact John Smith at (555) 123-4567 or email john.smith@email.com");

        assert_eq!(find(&entities, &PiiCategory::Name), vec!["John Smith"]);
        assert!(find(&entities, &PiiCategory::Phone).contains(&"(555) 123-4567"));
        assert!(find(&entities, &PiiCategory::Email).contains(&"john.smith@email.com"));
    }

    #[test]
    fn test_offsets_match_text() {
        let text = "Grüße, Zoë. SSN 123-45-6789 and card 4111 1111 1111 1111.";
        let entities = PatternDetector::new().unwrap().detect_in_text(text);

        assert!(!entities.is_empty());
        for entity in &entities {
            assert_eq!(&text[entity.start..entity.end], entity.text);
        }
    }

    #[test]
    fn test_contextual_match_excludes_label() {
        let entities = PatternDetector::new()
            .unwrap()
            .detect_in_text("Password: hunter2!")
            .into_iter()
            .filter(|e| e.category == PiiCategory::Password)
            .collect::<Vec<_>>();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "hunter2!");
        assert_eq!(entities[0].detection_method, DetectionMethod::ContextualPattern);
        assert_eq!(entities[0].confidence, 0.95);
    }

    #[test]
    fn test_category_allow_list() {
        let detector = PatternDetector::new()
            .unwrap()
            .with_categories(vec![PiiCategory::Email]);
        let entities = detector.detect_in_text("Jane Doe, jane@example.com, 555-123-4567");

        assert!(!entities.is_empty());
        assert!(entities.iter().all(|e| e.category == PiiCategory::Email));
    }

    #[test]
    fn test_names_enable_name_with_title() {
        let detector = PatternDetector::new()
            .unwrap()
            .with_categories(vec![PiiCategory::Name]);
        let entities = detector.detect_in_text("Sarah Jenkins (CEO, J-Tech Solutions)");

        assert!(entities
            .iter()
            .any(|e| e.category == PiiCategory::NameWithTitle
                && e.text == "Sarah Jenkins (CEO, J-Tech Solutions)"));
        assert!(entities.iter().all(|e| e.category != PiiCategory::Title));
    }

    #[test]
    fn test_no_pii() {
        let entities = PatternDetector::new()
            .unwrap()
            .detect_in_text("the weather is pleasant and nothing else happened");
        assert!(entities.is_empty());
    }

    #[tokio::test]
    async fn test_detect_via_trait() {
        let detector: Arc<dyn EntityDetector> = Arc::new(PatternDetector::new().unwrap());
        let detection = detector.detect("mail: a@b.io").await.unwrap();

        assert_eq!(detector.name(), "pattern");
        assert_eq!(detection.usage.requests, 0);
        assert!(!detection.entities.is_empty());
    }
}
