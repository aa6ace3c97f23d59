//! Assess command implementation
//!
//! Runs detection over a text file and prints the risk report without
//! producing redacted output.

use super::{prepare, DetectionArgs, Prepared};
use crate::redaction::TextSource;
use clap::Args;

/// Arguments for the assess command
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Input text file
    pub input: String,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AssessArgs {
    /// Execute the assess command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting assess command");

        let Prepared { engine, document } =
            match prepare(config_path, &self.input, |config| self.detection.apply(config)) {
                Ok(prepared) => prepared,
                Err(code) => return Ok(code),
            };

        let report = match engine.assess(&document.full_text()).await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("❌ Assessment failed: {e}");
                return Ok(super::exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(0);
        }

        println!("🔍 PII risk assessment: {}", self.input);
        println!();
        println!("  Risk Level:          {}", report.level);
        println!("  Risk Score:          {}", report.score);
        println!("  Total Entities:      {}", report.total_entities);
        println!("  High-Risk Entities:  {}", report.high_risk_entities);

        if !report.category_breakdown.is_empty() {
            println!();
            println!("  By category:");
            for (category, count) in &report.category_breakdown {
                println!("    {:28} {:>5}", category.label(), count);
            }
        }

        println!();
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!("  • {recommendation}");
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_assess_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let config = dir.path().join("radact.toml");
        std::fs::write(&config, "").unwrap();
        std::fs::write(&input, "SSN 123-45-6789").unwrap();

        let args = AssessArgs {
            input: input.display().to_string(),
            detection: DetectionArgs::default(),
            json: true,
        };

        assert_eq!(args.execute(config.to_str().unwrap()).await.unwrap(), 0);
    }
}
