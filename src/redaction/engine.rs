//! Main redaction engine
//!
//! This module provides the [`RedactionEngine`] that orchestrates chunking,
//! PII detection, merging, redaction and audit logging for one text at a time.
//!
//! # Pipeline
//!
//! 1. The input is split into overlapping chunks; every chunk's start offset
//!    is known before any detection runs.
//! 2. Chunks are dispatched to the detector with bounded concurrency. A chunk
//!    whose detection fails contributes zero entities.
//! 3. Offsets are shifted back into the original text, low-confidence
//!    candidates are dropped and the rest are merged into a non-overlapping set.
//! 4. The redactor substitutes tokens; the result carries call-scoped telemetry.
//!
//! # Examples
//!
//! ```no_run
//! use radact::config::RadactConfig;
//! use radact::redaction::RedactionEngine;
//!
//! # async fn example() -> radact::domain::Result<()> {
//! let engine = RedactionEngine::new(RadactConfig::default())?;
//!
//! let result = engine
//!     .redact("Contact John Smith at (555) 123-4567")
//!     .await?;
//! println!("{}", result.redacted_text);
//! # Ok(())
//! # }
//! ```

use crate::adapters::provider::{AzureOpenAiProvider, EntityRecognitionProvider};
use crate::config::{PricingConfig, RadactConfig};
use crate::domain::{RadactError, Result};
use crate::redaction::audit::AuditLogger;
use crate::redaction::chunker::Chunker;
use crate::redaction::config::DetectionStrategy;
use crate::redaction::cost::CostEstimate;
use crate::redaction::detector::{
    Detection, EntityDetector, HybridDetector, PatternDetector, PatternRegistry, ProviderDetector,
};
use crate::redaction::document::{redact_runs, TextRun, TextSource};
use crate::redaction::merge::{filter_by_confidence, merge_entities, normalize_offsets};
use crate::redaction::models::{Entity, RedactionResult, Telemetry};
use crate::redaction::redactor::{Redactor, TokenTable};
use crate::redaction::risk::{self, RiskReport};
use crate::{log_chunk_failure, log_redaction_complete, log_redaction_start};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Main redaction engine
///
/// Immutable after construction. Wrap it in an `Arc` to serve concurrent
/// calls; every call keeps its own telemetry and cost counters.
pub struct RedactionEngine {
    config: RadactConfig,
    chunker: Chunker,
    detector: Arc<dyn EntityDetector>,
    redactor: Redactor,
    audit_logger: Option<AuditLogger>,
    pricing: PricingConfig,
}

/// Result of redacting a [`TextSource`]
#[derive(Debug, Clone)]
pub struct DocumentRedaction {
    /// Offset-accurate result over the full text
    pub result: RedactionResult,
    /// Redacted runs, in source order; they render to `result.redacted_text`
    pub runs: Vec<TextRun>,
}

impl RedactionEngine {
    /// Create a new redaction engine
    ///
    /// Builds the detector selected by `detection.strategy`, constructing the
    /// Azure OpenAI provider for provider and hybrid strategies.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails (including a missing
    /// `[provider]` section for a strategy that needs one), and a detection
    /// error if the pattern library cannot be loaded.
    pub fn new(config: RadactConfig) -> Result<Self> {
        config.validate().map_err(RadactError::Configuration)?;

        let provider: Option<Arc<dyn EntityRecognitionProvider>> =
            match (&config.provider, config.detection.strategy.requires_provider()) {
                (Some(provider_config), true) => {
                    let provider = AzureOpenAiProvider::new(provider_config.clone())?;
                    Some(Arc::new(provider) as Arc<dyn EntityRecognitionProvider>)
                }
                _ => None,
            };

        Self::build(config, provider)
    }

    /// Create an engine around an already-constructed provider
    ///
    /// The `[provider]` section may be absent; the given provider is used for
    /// provider and hybrid strategies and ignored for the pattern strategy.
    pub fn with_provider(
        config: RadactConfig,
        provider: Arc<dyn EntityRecognitionProvider>,
    ) -> Result<Self> {
        config
            .validate_sections()
            .map_err(RadactError::Configuration)?;
        Self::build(config, Some(provider))
    }

    fn build(
        config: RadactConfig,
        provider: Option<Arc<dyn EntityRecognitionProvider>>,
    ) -> Result<Self> {
        let detection = &config.detection;

        let registry = match detection.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        }
        .map_err(|e| RadactError::Detection(format!("{e:#}")))?;

        let pattern_detector = Arc::new(
            PatternDetector::with_registry(registry).with_categories(detection.categories.clone()),
        );

        let provider_detector = |provider: Arc<dyn EntityRecognitionProvider>| {
            Arc::new(ProviderDetector::new(
                provider,
                detection.categories.clone(),
                detection.confidence_threshold,
            ))
        };

        let detector: Arc<dyn EntityDetector> = match (detection.strategy, provider) {
            (DetectionStrategy::Pattern, _) => pattern_detector,
            (DetectionStrategy::Provider, Some(provider)) => provider_detector(provider),
            (DetectionStrategy::Hybrid, Some(provider)) => {
                let inner: Vec<Arc<dyn EntityDetector>> =
                    vec![provider_detector(provider), pattern_detector];
                Arc::new(HybridDetector::new(inner))
            }
            (strategy, None) => {
                return Err(RadactError::Configuration(format!(
                    "provider configuration is required when detection.strategy = '{strategy}'"
                )))
            }
        };

        let audit_logger = if config.audit.enabled {
            Some(
                AuditLogger::new(config.audit.log_path.clone(), config.audit.json_format)
                    .map_err(|e| RadactError::Io(format!("{e:#}")))?,
            )
        } else {
            None
        };

        let pricing = config
            .provider
            .as_ref()
            .map(|p| p.pricing)
            .unwrap_or_default();

        tracing::debug!(
            strategy = %detection.strategy,
            detector = detector.name(),
            chunk_size = detection.chunk_size,
            overlap_size = detection.overlap_size,
            audit = audit_logger.is_some(),
            "Redaction engine initialized"
        );

        Ok(Self {
            chunker: Chunker::new(detection.chunk_size, detection.overlap_size),
            redactor: Redactor::new(TokenTable::from_config(&config.redaction)),
            detector,
            audit_logger,
            pricing,
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &RadactConfig {
        &self.config
    }

    /// Token table used for substitutions
    pub fn tokens(&self) -> &TokenTable {
        self.redactor.tokens()
    }

    /// Detect the final, non-overlapping entity set for `text`
    pub async fn detect(&self, text: &str) -> Result<Vec<Entity>> {
        let (entities, _) = self.detect_entities(text).await;
        Ok(entities)
    }

    /// Detect and redact PII in `text`
    ///
    /// # Errors
    ///
    /// Detection failures never fail the call; they are counted in
    /// `telemetry.chunks_failed`. An error is returned only if the audit
    /// record cannot be written.
    pub async fn redact(&self, text: &str) -> Result<RedactionResult> {
        let started = Instant::now();
        let (entities, telemetry) = self.detect_entities(text).await;
        let redacted = self.redactor.redact(text, &entities);
        self.finish(text, redacted, entities, telemetry, started)
    }

    /// Detect PII and score the exposure without producing redacted text
    pub async fn assess(&self, text: &str) -> Result<RiskReport> {
        let (entities, _) = self.detect_entities(text).await;
        Ok(risk::assess(&entities))
    }

    /// Estimate provider cost for `text` without calling the provider
    pub fn estimate(&self, text: &str) -> CostEstimate {
        let chunks = self.chunker.chunk(text).len();
        CostEstimate::estimate(
            text.len(),
            chunks,
            self.config.detection.strategy.requires_provider(),
            &self.pricing,
        )
    }

    /// Redact a document run by run, preserving its layout
    ///
    /// Detection runs over the joined text; entity offsets are then mapped onto
    /// the runs, so separators are only removed where an entity covers them.
    pub async fn redact_document<S>(&self, source: &S) -> Result<DocumentRedaction>
    where
        S: TextSource + ?Sized + Sync,
    {
        let started = Instant::now();
        let text = source.full_text();
        let (entities, telemetry) = self.detect_entities(&text).await;

        let runs = redact_runs(source.runs(), &entities, self.redactor.tokens());
        let redacted = self.redactor.redact(&text, &entities);
        let result = self.finish(&text, redacted, entities, telemetry, started)?;

        Ok(DocumentRedaction { result, runs })
    }

    fn finish(
        &self,
        text: &str,
        redacted: String,
        entities: Vec<Entity>,
        mut telemetry: Telemetry,
        started: Instant,
    ) -> Result<RedactionResult> {
        let elapsed = started.elapsed();
        telemetry.processing_time_ms = elapsed.as_millis() as u64;
        telemetry.completed_at = Utc::now();

        let result = RedactionResult::new(text.to_string(), redacted, entities, telemetry);

        if let Some(ref audit) = self.audit_logger {
            audit
                .log_redaction(&result, self.redactor.tokens().style())
                .map_err(|e| RadactError::Io(format!("{e:#}")))?;
        }

        log_redaction_complete!(
            result.telemetry.run_id,
            result.entities.len(),
            result.telemetry.chunks_failed,
            elapsed
        );

        Ok(result)
    }

    /// Chunk, detect concurrently, then normalize, filter and merge
    async fn detect_entities(&self, text: &str) -> (Vec<Entity>, Telemetry) {
        let chunks = self.chunker.chunk(text);
        let mut telemetry = Telemetry::new(self.detector.name());
        telemetry.chunks_processed = chunks.len();

        log_redaction_start!(
            telemetry.run_id,
            self.config.detection.strategy,
            text.len(),
            chunks.len()
        );

        let detector = &self.detector;
        let outcomes: Vec<_> = stream::iter(chunks.iter().enumerate())
            .map(|(index, chunk)| async move {
                let outcome = if chunk.text.trim().is_empty() {
                    Ok(Detection::default())
                } else {
                    detector.detect(chunk.text).await
                };
                (index, chunk.start_offset, outcome)
            })
            .buffered(self.config.detection.max_concurrency)
            .collect()
            .await;

        let mut candidates = Vec::new();
        for (index, start_offset, outcome) in outcomes {
            match outcome {
                Ok(detection) => {
                    telemetry.cost.record(detection.usage, &self.pricing);
                    candidates.extend(normalize_offsets(detection.entities, start_offset));
                }
                Err(e) => {
                    log_chunk_failure!(index, start_offset, e);
                    telemetry.chunks_failed += 1;
                }
            }
        }

        let entities = merge_entities(filter_by_confidence(
            candidates,
            self.config.detection.confidence_threshold,
        ));

        if telemetry.cost.total_cost > self.pricing.cost_alert_threshold {
            tracing::warn!(
                run_id = %telemetry.run_id,
                total_cost = telemetry.cost.total_cost,
                threshold = self.pricing.cost_alert_threshold,
                "Provider cost for this call exceeded the alert threshold"
            );
        }

        (entities, telemetry)
    }
}
