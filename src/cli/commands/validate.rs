//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Radact configuration file.

use crate::config::load_config;
use crate::redaction::detector::PatternRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match config.detection.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let pattern_count = match registry {
            Ok(registry) => registry.all_patterns().len(),
            Err(e) => {
                println!("❌ Pattern library failed to load");
                println!("   Error: {e:#}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Strategy: {}", config.detection.strategy);
        println!(
            "  Confidence Threshold: {}",
            config.detection.confidence_threshold
        );
        println!(
            "  Chunk Size: {} (overlap {})",
            config.detection.chunk_size, config.detection.overlap_size
        );
        println!("  Max Concurrency: {}", config.detection.max_concurrency);
        println!("  Categories: {:?}", config.detection.categories);
        println!("  Patterns Loaded: {pattern_count}");
        println!("  Token Style: {}", config.redaction.style);

        if let Some(ref provider) = config.provider {
            println!("  Provider Endpoint: {}", provider.endpoint);
            println!("  Provider Deployment: {}", provider.deployment);
            println!("  Max Retries: {}", provider.retry.max_retries);
        }

        println!(
            "  Audit Log: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_validate_valid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radact.toml");
        std::fs::write(&path, "[detection]\nstrategy = \"pattern\"\n").unwrap();

        let code = ValidateArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radact.toml");
        std::fs::write(&path, "[detection]\nstrategy = \"hybrid\"\n").unwrap();

        let code = ValidateArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/radact.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
