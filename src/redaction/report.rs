//! Redaction reporting
//!
//! This module provides formatted reports for a redaction run, showing
//! per-category statistics, sample replacements, risk and provider cost.

use crate::redaction::cost::CostTracker;
use crate::redaction::models::{Entity, PiiCategory, RedactionResult};
use crate::redaction::redactor::TokenTable;
use crate::redaction::risk::{self, RiskReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Maximum samples kept in a report
const MAX_SAMPLES: usize = 20;

/// Maximum samples printed to the console
const CONSOLE_SAMPLES: usize = 10;

/// Preview length for original values, in characters
const PREVIEW_CHARS: usize = 50;

/// Report for one redaction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Run id shared with the audit log
    pub run_id: Uuid,

    /// Detector that produced the entities
    pub detector: String,

    /// Total entities redacted
    pub total_entities: usize,

    /// Entity count per category
    pub counts_by_category: BTreeMap<PiiCategory, usize>,

    /// Mean confidence per category
    pub avg_confidence_by_category: BTreeMap<PiiCategory, f32>,

    /// Sample replacements (original value truncated)
    pub samples: Vec<RedactionSample>,

    /// Risk assessment of the detected entities
    pub risk: RiskReport,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Sample replacement showing before/after
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionSample {
    /// PII category
    pub category: PiiCategory,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,

    /// Replacement token
    pub token: String,

    /// Original value (truncated for privacy)
    pub preview: String,

    /// Start offset in the original text
    pub start: usize,
}

/// Processing statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Chunks the input was split into
    pub chunks_processed: usize,

    /// Chunks that contributed no entities because detection failed
    pub chunks_failed: usize,

    /// Total processing time (ms)
    pub processing_time_ms: u64,

    /// Provider usage and cost
    pub cost: CostTracker,
}

impl RedactionReport {
    /// Build a report from a redaction result
    pub fn new(result: &RedactionResult, tokens: &TokenTable) -> Self {
        let samples = result
            .entities
            .iter()
            .take(MAX_SAMPLES)
            .map(|entity| sample(entity, tokens))
            .collect();

        Self {
            run_id: result.telemetry.run_id,
            detector: result.telemetry.detector.clone(),
            total_entities: result.total_entities(),
            counts_by_category: result.counts_by_category.clone(),
            avg_confidence_by_category: result.avg_confidence_by_category.clone(),
            samples,
            risk: risk::assess(&result.entities),
            stats: ProcessingStats {
                chunks_processed: result.telemetry.chunks_processed,
                chunks_failed: result.telemetry.chunks_failed,
                processing_time_ms: result.telemetry.processing_time_ms,
                cost: result.telemetry.cost.clone(),
            },
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      PII REDACTION REPORT                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Run ID:                {}\n", self.run_id));
        output.push_str(&format!("  Detector:              {}\n", self.detector));
        output.push_str(&format!("  Total PII Entities:    {}\n", self.total_entities));
        output.push_str(&format!(
            "  Chunks Processed:      {} ({} failed)\n",
            self.stats.chunks_processed, self.stats.chunks_failed
        ));
        output.push_str(&format!(
            "  Processing Time:       {} ms\n",
            self.stats.processing_time_ms
        ));
        output.push('\n');

        if !self.counts_by_category.is_empty() {
            output.push_str("🔍 PII DETECTIONS BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut categories: Vec<_> = self.counts_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in categories {
                let confidence = self
                    .avg_confidence_by_category
                    .get(category)
                    .copied()
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  {:30} {:>5}   avg {:>6.2}%\n",
                    category.label(),
                    count,
                    confidence * 100.0
                ));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE REDACTIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for (i, sample) in self.samples.iter().take(CONSOLE_SAMPLES).enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Category:    {}\n", sample.category));
                output.push_str(&format!(
                    "    Confidence:  {:.2}%\n",
                    sample.confidence * 100.0
                ));
                output.push_str(&format!("    Original:    \"{}\"\n", sample.preview));
                output.push_str(&format!("    Redacted:    \"{}\"\n", sample.token));
            }
            output.push('\n');
        }

        output.push_str("⚠️  RISK ASSESSMENT\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Risk Level:            {} (score {})\n",
            self.risk.level, self.risk.score
        ));
        output.push_str(&format!(
            "  High-Risk Entities:    {}\n",
            self.risk.high_risk_entities
        ));
        for recommendation in &self.risk.recommendations {
            output.push_str(&format!("  • {recommendation}\n"));
        }
        output.push('\n');

        let cost = &self.stats.cost;
        if cost.requests_made > 0 {
            output.push_str("💰 PROVIDER COST\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!("  Requests:              {}\n", cost.requests_made));
            output.push_str(&format!(
                "  Tokens:                {} in / {} out\n",
                cost.input_tokens, cost.output_tokens
            ));
            output.push_str(&format!("  Cost:                  ${:.6}\n", cost.total_cost));
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file as JSON
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

fn sample(entity: &Entity, tokens: &TokenTable) -> RedactionSample {
    RedactionSample {
        category: entity.category.clone(),
        confidence: entity.confidence,
        token: tokens.token_for(&entity.category).into_owned(),
        preview: preview(&entity.text),
        start: entity.start,
    }
}

/// Truncate to [`PREVIEW_CHARS`] characters, marking the cut with `...`
fn preview(value: &str) -> String {
    if value.chars().count() > PREVIEW_CHARS {
        let head: String = value.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}
