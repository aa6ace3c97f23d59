//! Risk assessment over a merged entity set

use crate::redaction::models::{Entity, PiiCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score above which a text is high risk
pub const HIGH_RISK_SCORE: u32 = 20;

/// Score above which a text is medium risk
pub const MEDIUM_RISK_SCORE: u32 = 10;

/// Entities below this confidence count as high-risk (uncertain) detections
pub const LOW_CONFIDENCE: f32 = 0.7;

/// Overall risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Risk report for one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Weighted sum over all entities
    pub score: u32,
    /// Level derived from `score`
    pub level: RiskLevel,
    /// Number of entities assessed
    pub total_entities: usize,
    /// SSN/credit-card entities plus low-confidence entities
    pub high_risk_entities: usize,
    /// Entity count per category
    pub category_breakdown: BTreeMap<PiiCategory, usize>,
    /// Ordered handling recommendations
    pub recommendations: Vec<String>,
}

/// Weight of one entity of `category` in the risk score
pub fn category_weight(category: &PiiCategory) -> u32 {
    match category {
        PiiCategory::CreditCard | PiiCategory::Ssn => 5,
        PiiCategory::Address => 4,
        PiiCategory::Phone => 3,
        PiiCategory::Name | PiiCategory::NameWithTitle | PiiCategory::Email => 2,
        _ => 1,
    }
}

/// Map a score onto a level
pub fn level_for_score(score: u32) -> RiskLevel {
    if score > HIGH_RISK_SCORE {
        RiskLevel::High
    } else if score > MEDIUM_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Assess the privacy risk of a merged entity set
pub fn assess(entities: &[Entity]) -> RiskReport {
    let mut category_breakdown: BTreeMap<PiiCategory, usize> = BTreeMap::new();
    let mut score = 0u32;
    let mut high_risk_entities = 0usize;

    for entity in entities {
        *category_breakdown.entry(entity.category.clone()).or_insert(0) += 1;
        score = score.saturating_add(category_weight(&entity.category));

        let sensitive = matches!(entity.category, PiiCategory::Ssn | PiiCategory::CreditCard);
        if sensitive || entity.confidence < LOW_CONFIDENCE {
            high_risk_entities += 1;
        }
    }

    let level = if entities.is_empty() {
        RiskLevel::Low
    } else {
        level_for_score(score)
    };

    let recommendations = recommendations(level, &category_breakdown);

    RiskReport {
        score,
        level,
        total_entities: entities.len(),
        high_risk_entities,
        category_breakdown,
        recommendations,
    }
}

fn recommendations(level: RiskLevel, breakdown: &BTreeMap<PiiCategory, usize>) -> Vec<String> {
    let has = |category: PiiCategory| breakdown.contains_key(&category);
    let mut out = Vec::new();

    if level == RiskLevel::High {
        out.push("Immediate redaction recommended before sharing".to_string());
        out.push("Consider additional security measures".to_string());
    }
    if has(PiiCategory::Ssn) {
        out.push(
            "Social Security numbers detected - restrict distribution to authorised recipients"
                .to_string(),
        );
    }
    if has(PiiCategory::CreditCard) {
        out.push("Credit card numbers detected - ensure PCI compliance".to_string());
    }
    if has(PiiCategory::Phone) {
        out.push("Phone numbers found - verify consent for data processing".to_string());
    }
    if has(PiiCategory::Address) {
        out.push("Physical addresses detected - consider geographical privacy".to_string());
    }
    if breakdown.keys().any(PiiCategory::is_credential) {
        out.push("Credentials detected - rotate exposed secrets".to_string());
    }

    if out.is_empty() {
        out.push("No significant PII exposure detected".to_string());
    }
    out
}
