//! CLI command implementations
//!
//! This module contains all CLI command implementations plus the helpers
//! they share for loading configuration and building the engine.

pub mod assess;
pub mod estimate;
pub mod init;
pub mod redact;
pub mod validate;

use crate::config::{load_config, parse_config, RadactConfig};
use crate::domain::RadactError;
use crate::redaction::{DetectionStrategy, PlainTextDocument, RedactionEngine};
use clap::Args;
use std::path::Path;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "radact.toml";

/// Detection overrides shared by commands that run detection
#[derive(Args, Debug, Default)]
pub struct DetectionArgs {
    /// Override detection strategy (pattern, provider or hybrid)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Override minimum confidence (0.0-1.0)
    #[arg(long)]
    pub confidence: Option<f32>,
}

impl DetectionArgs {
    /// Apply the overrides to `config`
    pub fn apply(&self, config: &mut RadactConfig) -> Result<(), String> {
        if let Some(ref strategy) = self.strategy {
            tracing::info!(strategy = %strategy, "Overriding detection strategy from CLI");
            config.detection.strategy = strategy.parse::<DetectionStrategy>()?;
        }

        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(format!(
                    "--confidence must be between 0.0 and 1.0, got {confidence}"
                ));
            }
            tracing::info!(confidence, "Overriding confidence threshold from CLI");
            config.detection.confidence_threshold = confidence;
        }

        Ok(())
    }
}

/// Map an error to the CLI exit code
pub fn exit_code_for(error: &RadactError) -> i32 {
    match error {
        RadactError::Configuration(_) => 2,
        RadactError::Io(_) | RadactError::Validation(_) => 1,
        _ => 5,
    }
}

/// Load the configuration file.
///
/// A missing file is only tolerated at the default path, in which case the
/// defaults (plus `RADACT_*` environment overrides) are used.
pub fn load_effective_config(config_path: &str) -> crate::domain::Result<RadactConfig> {
    if config_path == DEFAULT_CONFIG_PATH && !Path::new(config_path).exists() {
        tracing::debug!("No configuration file found, using defaults");
        return parse_config("");
    }
    load_config(config_path)
}

/// Engine and input document for a detection command
pub(crate) struct Prepared {
    pub engine: RedactionEngine,
    pub document: PlainTextDocument,
}

/// Load config, apply overrides, build the engine and read the input.
///
/// Failures are reported on stderr and returned as an exit code.
pub(crate) fn prepare(
    config_path: &str,
    input: &str,
    customize: impl FnOnce(&mut RadactConfig) -> Result<(), String>,
) -> Result<Prepared, i32> {
    let mut config = match load_effective_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return Err(exit_code_for(&e));
        }
    };

    if let Err(e) = customize(&mut config) {
        eprintln!("❌ {e}");
        return Err(1);
    }

    let engine = match RedactionEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ {e}");
            return Err(exit_code_for(&e));
        }
    };

    let document = match PlainTextDocument::from_file(input) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("❌ {e}");
            return Err(exit_code_for(&e));
        }
    };

    Ok(Prepared { engine, document })
}
