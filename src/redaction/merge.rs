//! Offset normalization, confidence filtering and overlap resolution
//!
//! Candidates from every chunk and every detector are pooled, filtered, and
//! then merged into a single non-overlapping set. Filtering must happen before
//! the merge: dropping a high-confidence entity after it has already
//! suppressed a weaker overlapping one would lose both.

use crate::redaction::models::Entity;
use std::cmp::Ordering;

/// Shift chunk-relative entities to original-text offsets
pub fn normalize_offsets(entities: Vec<Entity>, start_offset: usize) -> Vec<Entity> {
    if start_offset == 0 {
        return entities;
    }
    entities
        .into_iter()
        .map(|entity| entity.offset_by(start_offset))
        .collect()
}

/// Drop entities with `confidence < threshold`
pub fn filter_by_confidence(entities: Vec<Entity>, threshold: f32) -> Vec<Entity> {
    entities
        .into_iter()
        .filter(|entity| entity.confidence >= threshold)
        .collect()
}

/// Resolve overlaps, preferring higher confidence.
///
/// Candidates are visited by confidence descending (ties: earliest start,
/// then longest span); each is kept only if it intersects nothing already
/// kept. The result is ordered by start offset.
pub fn merge_entities(mut candidates: Vec<Entity>) -> Vec<Entity> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then(a.start.cmp(&b.start))
            .then(b.end.cmp(&a.end))
    });

    let mut accepted: Vec<Entity> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        if accepted.iter().all(|kept| !kept.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::models::{DetectionMethod, PiiCategory};

    fn entity(start: usize, end: usize, confidence: f32, category: PiiCategory) -> Entity {
        Entity::new(
            "x".repeat(end - start),
            category,
            start,
            end,
            DetectionMethod::Pattern,
        )
        .with_confidence(confidence)
    }

    fn assert_no_overlaps(entities: &[Entity]) {
        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_higher_confidence_wins_overlap() {
        let merged = merge_entities(vec![
            entity(0, 13, 0.90, PiiCategory::Name),
            entity(0, 37, 0.95, PiiCategory::NameWithTitle),
            entity(22, 36, 0.90, PiiCategory::Name),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].category, PiiCategory::NameWithTitle);
        assert_eq!((merged[0].start, merged[0].end), (0, 37));
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let merged = merge_entities(vec![
            entity(12, 23, 0.90, PiiCategory::Ssn),
            entity(12, 23, 0.95, PiiCategory::Ssn),
            entity(12, 23, 0.90, PiiCategory::Ssn),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 0.95);
    }

    #[test]
    fn test_touching_spans_are_kept() {
        let merged = merge_entities(vec![
            entity(5, 10, 0.9, PiiCategory::Phone),
            entity(0, 5, 0.9, PiiCategory::Name),
            entity(10, 12, 0.9, PiiCategory::Email),
        ]);
        let starts: Vec<usize> = merged.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 5, 10]);
    }

    #[test]
    fn test_equal_confidence_prefers_earliest_start() {
        let merged = merge_entities(vec![
            entity(4, 10, 0.9, PiiCategory::Phone),
            entity(2, 6, 0.9, PiiCategory::Date),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].category, PiiCategory::Date);
    }

    #[test]
    fn test_merge_output_never_overlaps() {
        // dense, staggered candidates with varying confidence
        let mut candidates = Vec::new();
        for i in 0..40usize {
            let start = i * 3;
            let confidence = 0.5 + ((i * 7) % 10) as f32 / 20.0;
            candidates.push(entity(start, start + 5 + i % 4, confidence, PiiCategory::Name));
        }
        let merged = merge_entities(candidates);

        assert!(!merged.is_empty());
        assert_no_overlaps(&merged);
        for pair in merged.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_filter_before_merge_keeps_weaker_entity() {
        // The strong entity falls below the threshold; filtering first lets the
        // weaker, overlapping one survive instead of losing both.
        let candidates = vec![
            entity(0, 10, 0.75, PiiCategory::Name),
            entity(5, 15, 0.85, PiiCategory::Address),
        ];
        let merged = merge_entities(filter_by_confidence(candidates, 0.8));

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].category, PiiCategory::Address);
        assert!(merged.iter().all(|e| e.confidence >= 0.8));
    }

    #[test]
    fn test_normalize_offsets() {
        let shifted = normalize_offsets(vec![entity(0, 4, 0.9, PiiCategory::Ssn)], 2800);
        assert_eq!((shifted[0].start, shifted[0].end), (2800, 2804));
    }
}
