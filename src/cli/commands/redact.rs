//! Redact command implementation
//!
//! This module implements the `redact` command: detect PII in a plain text
//! file and write a redacted copy with the original paragraph layout.

use super::{prepare, DetectionArgs, Prepared};
use crate::redaction::document::{output_path_for, render};
use crate::redaction::{RedactionReport, RedactionStyle};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Input text file
    pub input: String,

    /// Output file (defaults to `<stem>_redacted.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override token style (standard, minimal or detailed)
    #[arg(long)]
    pub style: Option<String>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,

    /// Detect and report without writing the redacted file
    #[arg(long)]
    pub dry_run: bool,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, dry_run = self.dry_run, "Starting redact command");

        let prepared = prepare(config_path, &self.input, |config| {
            self.detection.apply(config)?;
            if let Some(ref style) = self.style {
                tracing::info!(style = %style, "Overriding redaction style from CLI");
                config.redaction.style = style.parse::<RedactionStyle>()?;
            }
            Ok(())
        });
        let Prepared { engine, document } = match prepared {
            Ok(prepared) => prepared,
            Err(code) => return Ok(code),
        };

        let redaction = match engine.redact_document(&document).await {
            Ok(redaction) => redaction,
            Err(e) => {
                eprintln!("❌ Redaction failed: {e}");
                return Ok(super::exit_code_for(&e));
            }
        };

        let report = RedactionReport::new(&redaction.result, engine.tokens());
        println!("{}", report.format_console());

        if let Some(ref report_path) = self.report {
            report.write_to_file(Path::new(report_path))?;
            println!("📄 Report written to {report_path}");
        }

        if redaction.result.telemetry.chunks_failed > 0 {
            println!(
                "⚠️  {} of {} chunks failed detection; review them for unredacted PII",
                redaction.result.telemetry.chunks_failed,
                redaction.result.telemetry.chunks_processed
            );
        }

        if self.dry_run {
            println!("🔍 Dry run: no output written");
            return Ok(0);
        }

        let output = self
            .output
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| output_path_for(Path::new(&self.input)));

        std::fs::write(&output, render(&redaction.runs))?;
        tracing::info!(output = %output.display(), "Redacted file written");
        println!("✅ Redacted file written to {}", output.display());

        Ok(0)
    }
}
