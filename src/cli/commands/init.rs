//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "radact.toml")]
    pub output: String,

    /// Include an Azure OpenAI provider section and use the hybrid strategy
    #[arg(long)]
    pub with_provider: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Radact configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_provider {
            Self::generate_provider_config()
        } else {
            Self::generate_pattern_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                if self.with_provider {
                    println!("  2. Create a .env file with your credentials:");
                    println!("     - Set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY");
                    println!("  3. Validate configuration: radact validate-config");
                    println!("  4. Estimate cost first: radact estimate <file>");
                } else {
                    println!("  2. Validate configuration: radact validate-config");
                    println!("  3. Run a dry run: radact redact <file> --dry-run");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Pattern-only configuration
    fn generate_pattern_config() -> String {
        format!(
            r#"# Radact Configuration File
# PII detection and redaction

[application]
name = "radact"
log_level = "info"

[detection]
# pattern | provider | hybrid
strategy = "pattern"
{DETECTION_COMMON}
{SHARED_SECTIONS}"#
        )
    }

    /// Hybrid configuration with an Azure OpenAI provider
    fn generate_provider_config() -> String {
        format!(
            r#"# Radact Configuration File
# PII detection and redaction

[application]
name = "radact"
log_level = "info"

[detection]
# pattern | provider | hybrid
strategy = "hybrid"
{DETECTION_COMMON}
[provider]
endpoint = "${{AZURE_OPENAI_ENDPOINT}}"
api_key = "${{AZURE_OPENAI_API_KEY}}"
deployment = "gpt-4o-mini"
api_version = "2024-02-01"
temperature = 0.1
max_tokens = 4000
timeout_seconds = 60

[provider.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[provider.pricing]
# USD per 1,000 tokens
input_cost_per_1k = 0.00015
output_cost_per_1k = 0.0006
# Warn when a single run costs more than this
cost_alert_threshold = 1.0

{SHARED_SECTIONS}"#
        )
    }
}

const DETECTION_COMMON: &str = r#"confidence_threshold = 0.8
chunk_size = 3000
overlap_size = 200
max_concurrency = 4
categories = ["names", "phone_numbers", "emails", "addresses", "ssn", "credit_cards"]
# pattern_library = "./patterns/custom.toml"
"#;

const SHARED_SECTIONS: &str = r#"[redaction]
# standard | minimal | detailed
style = "standard"

[redaction.overrides]
# ssn = "[GOV_ID]"

[audit]
enabled = false
log_path = "./audit/redaction.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::redaction::DetectionStrategy;
    use tempfile::tempdir;

    #[test]
    fn test_pattern_config_parses() {
        let config = parse_config(&InitArgs::generate_pattern_config()).unwrap();
        assert_eq!(config.detection.strategy, DetectionStrategy::Pattern);
        assert!(config.provider.is_none());
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_provider_config_contents() {
        let config = InitArgs::generate_provider_config();
        assert!(config.contains("strategy = \"hybrid\""));
        assert!(config.contains("api_key = \"${AZURE_OPENAI_API_KEY}\""));
        assert!(config.contains("[provider.retry]"));
        assert!(config.contains("[redaction]"));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("radact.toml");
        std::fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.display().to_string(),
            with_provider: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[detection]"));
    }
}
