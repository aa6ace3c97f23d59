//! Offset-accurate text redaction
//!
//! Replacements are applied from the highest start offset down, so every
//! not-yet-applied span still indexes the untouched prefix of the string.
//! Text outside entity spans is copied byte-for-byte.

pub mod tokens;

use crate::redaction::models::Entity;

pub use tokens::{RedactionStyle, TokenTable};

/// Replaces entity spans with category tokens
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    tokens: TokenTable,
}

impl Redactor {
    /// Create a redactor for a token table
    pub fn new(tokens: TokenTable) -> Self {
        Self { tokens }
    }

    /// Token table in use
    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    /// Redact `original` using non-overlapping `entities` (any order).
    ///
    /// Entities that fall outside the text, split a UTF-8 character, or
    /// overlap an entity already applied are skipped with a warning.
    pub fn redact(&self, original: &str, entities: &[Entity]) -> String {
        let mut ordered: Vec<&Entity> = entities.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let mut redacted = original.to_string();
        let mut applied_floor = original.len();

        for entity in ordered {
            let valid = entity.start < entity.end
                && entity.end <= applied_floor
                && original.is_char_boundary(entity.start)
                && original.is_char_boundary(entity.end);

            if !valid {
                tracing::warn!(
                    start = entity.start,
                    end = entity.end,
                    category = %entity.category,
                    "Skipping entity with invalid or overlapping span"
                );
                continue;
            }

            let token = self.tokens.token_for(&entity.category);
            redacted.replace_range(entity.start..entity.end, &token);
            applied_floor = entity.start;
        }

        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::models::{DetectionMethod, PiiCategory};

    fn entity(text: &str, original: &str, category: PiiCategory) -> Entity {
        let start = original.find(text).unwrap();
        Entity::new(
            text,
            category,
            start,
            start + text.len(),
            DetectionMethod::Pattern,
        )
    }

    #[test]
    fn test_redact_in_any_input_order() {
        let original = "Call Jane Doe at 555-123-4567 today";
        let entities = vec![
            entity("Jane Doe", original, PiiCategory::Name),
            entity("555-123-4567", original, PiiCategory::Phone),
        ];
        let redactor = Redactor::new(TokenTable::new(RedactionStyle::Standard));

        let forward = redactor.redact(original, &entities);
        let reversed: Vec<Entity> = entities.iter().rev().cloned().collect();

        assert_eq!(forward, "Call [NAME_REDACTED] at [PHONE_REDACTED] today");
        assert_eq!(redactor.redact(original, &reversed), forward);
    }

    #[test]
    fn test_redaction_is_pure() {
        let original = "mail me: a.b@example.org";
        let entities = vec![entity("a.b@example.org", original, PiiCategory::Email)];
        let redactor = Redactor::default();

        assert_eq!(
            redactor.redact(original, &entities),
            redactor.redact(original, &entities)
        );
    }

    #[test]
    fn test_no_entities_returns_original() {
        let original = "Nothing sensitive in here.";
        assert_eq!(Redactor::default().redact(original, &[]), original);
    }

    #[test]
    fn test_preserves_multibyte_context() {
        let original = "Grüße an Zoë Müller — tel 555-123-4567 ✓";
        let entities = vec![entity("555-123-4567", original, PiiCategory::Phone)];
        let redacted = Redactor::default().redact(original, &entities);
        assert_eq!(redacted, "Grüße an Zoë Müller — tel [PHONE_REDACTED] ✓");
    }

    #[test]
    fn test_skips_invalid_spans() {
        let original = "short";
        let out_of_bounds = Entity::new("x", PiiCategory::Ssn, 3, 40, DetectionMethod::Provider);
        let overlapping_a = Entity::new("sho", PiiCategory::Name, 0, 3, DetectionMethod::Pattern);
        let overlapping_b = Entity::new("hor", PiiCategory::Name, 1, 4, DetectionMethod::Pattern);

        let redacted = Redactor::default().redact(
            original,
            &[out_of_bounds, overlapping_a, overlapping_b],
        );
        assert_eq!(redacted, "s[NAME_REDACTED]t");
    }
}
