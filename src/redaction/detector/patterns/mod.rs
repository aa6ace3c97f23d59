//! Pattern library for PII detection
//!
//! Patterns are loaded from an ordered TOML list (`[[patterns]]`) and compiled
//! with `fancy_regex` so rules can use lookaround. The default library is
//! embedded in the binary; a user library file replaces it wholesale.

use crate::redaction::models::PiiCategory;
use anyhow::{Context, Result};
use fancy_regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Default confidence for plain patterns
pub const PLAIN_CONFIDENCE: f32 = 0.90;

/// Default confidence for label-anchored patterns
pub const CONTEXTUAL_CONFIDENCE: f32 = 0.95;

/// How a pattern match maps onto an entity span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// The whole match is the PII value
    #[default]
    Plain,
    /// The match includes a label; only a capture group is the PII value
    Contextual,
}

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Rule name, used in logs and errors
    pub name: String,
    /// PII category label
    pub category: String,
    /// Plain or contextual
    #[serde(default)]
    pub kind: PatternKind,
    /// Confidence score (0.0 - 1.0); defaults by kind
    pub confidence: Option<f32>,
    /// Capture group holding the value for contextual patterns
    pub group: Option<usize>,
    /// Regex patterns, applied in order
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Rule name
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// PII category
    pub category: PiiCategory,
    /// Plain or contextual
    pub kind: PatternKind,
    /// Confidence score
    pub confidence: f32,
    /// Capture group that forms the entity span (0 for plain patterns)
    pub group: usize,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: Vec<PatternDefinition>,
}

/// Ordered pattern registry for PII detection
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();

        for def in library.patterns {
            let category = PiiCategory::parse(&def.category);
            let confidence = def.confidence.unwrap_or(match def.kind {
                PatternKind::Plain => PLAIN_CONFIDENCE,
                PatternKind::Contextual => CONTEXTUAL_CONFIDENCE,
            });
            if !(0.0..=1.0).contains(&confidence) {
                anyhow::bail!(
                    "Invalid confidence in pattern '{}': {confidence} (expected 0.0-1.0)",
                    def.name
                );
            }

            let group = match def.kind {
                PatternKind::Plain => 0,
                PatternKind::Contextual => def.group.unwrap_or(1),
            };

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).with_context(|| {
                    format!("Invalid regex in pattern '{}': {pattern_str}", def.name)
                })?;

                if group >= regex.captures_len() {
                    anyhow::bail!(
                        "Pattern '{}' uses capture group {group} but '{pattern_str}' has only {} groups",
                        def.name,
                        regex.captures_len() - 1
                    );
                }

                patterns.push(CompiledPattern {
                    name: def.name.clone(),
                    regex,
                    category: category.clone(),
                    kind: def.kind,
                    confidence,
                    group,
                });
            }
        }

        Ok(Self { patterns })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns in application order
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific category, in application order
    pub fn patterns_for_category<'a>(
        &'a self,
        category: &'a PiiCategory,
    ) -> impl Iterator<Item = &'a CompiledPattern> + 'a {
        self.patterns.iter().filter(move |p| &p.category == category)
    }
}
