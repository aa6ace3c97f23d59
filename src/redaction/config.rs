//! Detection and redaction configuration

use crate::redaction::models::PiiCategory;
use crate::redaction::redactor::RedactionStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which detector(s) to run over each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Local pattern rules only
    #[default]
    Pattern,
    /// Remote entity recognition provider only
    Provider,
    /// Both, results concatenated before merging
    Hybrid,
}

impl DetectionStrategy {
    /// Whether this strategy needs provider credentials
    pub fn requires_provider(&self) -> bool {
        matches!(self, Self::Provider | Self::Hybrid)
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => write!(f, "pattern"),
            Self::Provider => write!(f, "provider"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern" | "regex" => Ok(Self::Pattern),
            "provider" | "llm" => Ok(Self::Provider),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!(
                "Invalid detection strategy '{s}'. Must be one of: pattern, provider, hybrid"
            )),
        }
    }
}

/// Detection configuration (`[detection]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Detector strategy
    #[serde(default)]
    pub strategy: DetectionStrategy,

    /// Entities below this confidence are dropped before merging
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Maximum chunk size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in bytes
    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,

    /// Maximum chunks in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Enabled categories (empty enables all)
    #[serde(default = "default_categories")]
    pub categories: Vec<PiiCategory>,

    /// Optional pattern library replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_library: Option<PathBuf>,
}

fn default_confidence_threshold() -> f32 {
    0.8
}

fn default_chunk_size() -> usize {
    3000
}

fn default_overlap_size() -> usize {
    200
}

fn default_max_concurrency() -> usize {
    4
}

fn default_categories() -> Vec<PiiCategory> {
    vec![
        PiiCategory::Name,
        PiiCategory::Phone,
        PiiCategory::Email,
        PiiCategory::Address,
        PiiCategory::Ssn,
        PiiCategory::CreditCard,
    ]
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            confidence_threshold: default_confidence_threshold(),
            chunk_size: default_chunk_size(),
            overlap_size: default_overlap_size(),
            max_concurrency: default_max_concurrency(),
            categories: default_categories(),
            pattern_library: None,
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "detection.confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }

        if self.chunk_size == 0 {
            return Err("detection.chunk_size must be > 0".to_string());
        }

        if self.overlap_size >= self.chunk_size {
            return Err(format!(
                "detection.overlap_size ({}) must be smaller than detection.chunk_size ({})",
                self.overlap_size, self.chunk_size
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(format!(
                "detection.max_concurrency must be between 1 and 64, got {}",
                self.max_concurrency
            ));
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!(
                    "Pattern library file not found: {}",
                    path.display()
                ));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }
}

/// Token configuration (`[redaction]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token preset
    #[serde(default)]
    pub style: RedactionStyle,

    /// Per-category token overrides keyed by category name
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl TokenConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (category, token) in &self.overrides {
            if token.is_empty() {
                return Err(format!(
                    "redaction.overrides.{category} must not be an empty token"
                ));
            }
        }
        Ok(())
    }
}

/// Audit logging configuration (`[audit]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines (otherwise a compact text line per run)
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/redaction.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}
