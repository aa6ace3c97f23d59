// Radact - PII Detection and Redaction Tool
// Copyright (c) 2025 Radact Contributors
// Licensed under the MIT License

//! # Radact - PII Detection and Redaction
//!
//! Radact finds personally identifiable information in free text and replaces
//! every detected span with a category token, leaving the rest of the text
//! byte-for-byte intact.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Chunking** long inputs into bounded, overlapping, sentence-aware slices
//! - **Detecting** PII with local patterns, a remote recognition provider, or both
//! - **Merging** candidates into a single non-overlapping entity set
//! - **Redacting** with standard, minimal or detailed token presets
//! - **Assessing** risk and estimating provider cost
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`redaction`] - Detection, merging, redaction, risk, audit and reporting
//! - [`adapters`] - External integrations (entity recognition providers)
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use radact::config::load_config;
//! use radact::redaction::RedactionEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("radact.toml")?;
//!     let engine = RedactionEngine::new(config)?;
//!
//!     let result = engine
//!         .redact("Contact John Smith at (555) 123-4567")
//!         .await?;
//!
//!     println!("{}", result.redacted_text);
//!     println!("{} entities", result.total_entities());
//!     Ok(())
//! }
//! ```
//!
//! ## Detection Strategies
//!
//! - **pattern**: the built-in (or a custom) TOML pattern library, no network
//! - **provider**: Azure OpenAI chat completions, with retries and cost tracking
//! - **hybrid**: both; a failing provider never blocks pattern results
//!
//! A chunk whose detection fails contributes zero entities and is counted in
//! the result's telemetry. Only invalid configuration fails a call up front.
//!
//! ## Error Handling
//!
//! Radact uses the [`domain::RadactError`] type for all errors:
//!
//! ```rust,no_run
//! use radact::domain::RadactError;
//!
//! fn example() -> Result<(), RadactError> {
//!     let config = radact::config::load_config("radact.toml")?;
//!     config.validate().map_err(RadactError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod redaction;
