//! Redaction module for Radact
//!
//! This module provides PII detection and redaction for free text. Detection
//! is pluggable (local patterns, a remote recognition provider, or both) and
//! every detected span is replaced by a category token at its exact offset.
//!
//! # Architecture
//!
//! The redaction pipeline consists of:
//! - **Chunking**: bounded, overlapping, sentence-aware slices of the input
//! - **Detection**: [`EntityDetector`](detector::EntityDetector) implementations run per chunk
//! - **Merging**: offset normalization, confidence filtering, overlap resolution
//! - **Redaction**: token substitution from a configurable token table
//! - **Risk & Audit**: weighted risk scoring and hashed audit records
//!
//! # Usage
//!
//! ```rust,ignore
//! use radact::config::RadactConfig;
//! use radact::redaction::RedactionEngine;
//!
//! let engine = RedactionEngine::new(RadactConfig::default())?;
//! let result = engine.redact("Call me at (555) 123-4567").await?;
//! ```

pub mod audit;
pub mod chunker;
pub mod config;
pub mod cost;
pub mod detector;
pub mod document;
pub mod engine;
pub mod merge;
pub mod models;
pub mod redactor;
pub mod report;
pub mod risk;

// Re-export main types
pub use config::{DetectionConfig, DetectionStrategy};
pub use cost::{CostEstimate, CostTracker};
pub use document::{PlainTextDocument, TextRun, TextSource};
pub use engine::{DocumentRedaction, RedactionEngine};
pub use models::{Entity, PiiCategory, RedactionResult};
pub use redactor::{RedactionStyle, Redactor, TokenTable};
pub use report::RedactionReport;
pub use risk::{RiskLevel, RiskReport};
