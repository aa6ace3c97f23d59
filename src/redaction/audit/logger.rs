//! Append-only audit log writer

use crate::redaction::models::{Entity, RedactionResult};
use crate::redaction::redactor::RedactionStyle;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One audit line
#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    run_id: String,
    timestamp: String,
    detector: &'a str,
    style: String,
    entity_count: usize,
    chunks_processed: usize,
    chunks_failed: usize,
    processing_time_ms: u64,
    entities: Vec<AuditedEntity<'a>>,
}

/// Audited entity; the value itself is hashed
#[derive(Debug, Serialize)]
struct AuditedEntity<'a> {
    category: &'a str,
    start: usize,
    end: usize,
    confidence: f32,
    /// SHA-256 of the original text (never log plaintext PII)
    value_hash: String,
}

/// Audit logger for redaction runs
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Audit log file path
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one record for a completed redaction
    pub fn log_redaction(&self, result: &RedactionResult, style: RedactionStyle) -> Result<()> {
        let telemetry = &result.telemetry;
        let record = AuditRecord {
            run_id: telemetry.run_id.to_string(),
            timestamp: telemetry.completed_at.to_rfc3339(),
            detector: &telemetry.detector,
            style: style.to_string(),
            entity_count: result.entities.len(),
            chunks_processed: telemetry.chunks_processed,
            chunks_failed: telemetry.chunks_failed,
            processing_time_ms: telemetry.processing_time_ms,
            entities: result.entities.iter().map(audited).collect(),
        };

        let line = if self.json_format {
            serde_json::to_string(&record).context("Failed to serialize audit record")?
        } else {
            format!(
                "[{}] run={} detector={} style={} entities={} chunks={}/{} time={}ms",
                record.timestamp,
                record.run_id,
                record.detector,
                record.style,
                record.entity_count,
                record.chunks_processed.saturating_sub(record.chunks_failed),
                record.chunks_processed,
                record.processing_time_ms
            )
        };

        self.append_line(&line)
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        // single write so concurrent runs never interleave within a line
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
            .context("Failed to write audit record")?;
        Ok(())
    }
}

fn audited(entity: &Entity) -> AuditedEntity<'_> {
    AuditedEntity {
        category: entity.category.label(),
        start: entity.start,
        end: entity.end,
        confidence: entity.confidence,
        value_hash: hash_value(&entity.text),
    }
}

/// Hex SHA-256 of a value
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
