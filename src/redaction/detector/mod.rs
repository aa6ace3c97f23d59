//! PII detection
//!
//! Every detector implements [`EntityDetector`]: given one chunk of text it
//! returns candidate entities with chunk-relative byte offsets, plus whatever
//! provider token usage the detection cost. Detectors never merge or filter;
//! that happens once, over all chunks, in the engine.

pub mod hybrid;
pub mod pattern;
pub mod patterns;
pub mod provider;

use crate::adapters::provider::TokenUsage;
use crate::domain::Result;
use crate::redaction::models::Entity;
use async_trait::async_trait;

pub use hybrid::HybridDetector;
pub use pattern::PatternDetector;
pub use patterns::{CompiledPattern, PatternKind, PatternRegistry};
pub use provider::ProviderDetector;

/// Candidates found in one chunk
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Candidate entities, offsets relative to the chunk
    pub entities: Vec<Entity>,
    /// Provider usage incurred (zero for local detectors)
    pub usage: TokenUsage,
}

impl Detection {
    /// Detection result with no provider usage
    pub fn local(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            usage: TokenUsage::default(),
        }
    }
}

/// Trait for PII detection implementations
///
/// Implementations must be immutable after construction so one instance can
/// serve concurrent chunks and concurrent calls.
#[async_trait]
pub trait EntityDetector: Send + Sync {
    /// Detect candidate entities in one chunk
    async fn detect(&self, text: &str) -> Result<Detection>;

    /// Detector name used in logs and telemetry
    fn name(&self) -> &str;
}
