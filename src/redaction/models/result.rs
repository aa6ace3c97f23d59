//! Redaction result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::entity::{Entity, PiiCategory};
use crate::redaction::cost::CostTracker;

/// Per-call telemetry returned alongside a [`RedactionResult`]
///
/// Everything here is scoped to one `redact` call; nothing is shared between
/// concurrent calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    /// Unique id of this run (also written to the audit log)
    pub run_id: Uuid,
    /// Detector strategy that produced the entities
    pub detector: String,
    /// Number of chunks the input was split into
    pub chunks_processed: usize,
    /// Chunks whose detection failed and contributed zero entities
    pub chunks_failed: usize,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
    /// Provider token usage and cost for this call
    pub cost: CostTracker,
    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
}

impl Telemetry {
    /// Create telemetry for a new run
    pub fn new(detector: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            detector: detector.into(),
            chunks_processed: 0,
            chunks_failed: 0,
            processing_time_ms: 0,
            cost: CostTracker::default(),
            completed_at: Utc::now(),
        }
    }
}

/// Result of redacting one text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Input text
    pub original_text: String,
    /// Output text with every entity span replaced by its token
    pub redacted_text: String,
    /// Non-overlapping entities ordered by start offset
    pub entities: Vec<Entity>,
    /// Entity count per category
    pub counts_by_category: BTreeMap<PiiCategory, usize>,
    /// Mean confidence per category
    pub avg_confidence_by_category: BTreeMap<PiiCategory, f32>,
    /// Call-scoped telemetry
    pub telemetry: Telemetry,
}

impl RedactionResult {
    /// Build a result, deriving the per-category statistics from `entities`
    pub fn new(
        original_text: String,
        redacted_text: String,
        entities: Vec<Entity>,
        telemetry: Telemetry,
    ) -> Self {
        let mut counts_by_category = BTreeMap::new();
        let mut confidence_sums: BTreeMap<PiiCategory, f32> = BTreeMap::new();
        for entity in &entities {
            *counts_by_category.entry(entity.category.clone()).or_insert(0) += 1;
            *confidence_sums.entry(entity.category.clone()).or_insert(0.0) += entity.confidence;
        }

        let avg_confidence_by_category = confidence_sums
            .into_iter()
            .map(|(category, sum)| {
                let count = counts_by_category.get(&category).copied().unwrap_or(1);
                (category, sum / count as f32)
            })
            .collect();

        Self {
            original_text,
            redacted_text,
            entities,
            counts_by_category,
            avg_confidence_by_category,
            telemetry,
        }
    }

    /// Get total number of entities
    pub fn total_entities(&self) -> usize {
        self.entities.len()
    }

    /// Check if any PII was detected
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }
}
