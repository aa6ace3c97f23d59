//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ProviderConfig, RadactConfig};
use super::secret::secret_string;
use crate::domain::errors::RadactError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RadactConfig
/// 4. Applies environment variable overrides (RADACT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RadactError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use radact::config::load_config;
///
/// let config = load_config("radact.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RadactConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RadactError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RadactError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), strategy = %config.detection.strategy, "Configuration loaded");
    Ok(config)
}

/// Parse configuration text (substitution, overrides and validation included)
pub fn parse_config(contents: &str) -> Result<RadactConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RadactConfig = toml::from_str(&contents)
        .map_err(|e| RadactError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RadactError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every unset variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RadactError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RadactError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        RadactError::Configuration(format!("Invalid value for {name} ('{value}'): {e}"))
    })
}

/// Applies environment variable overrides using RADACT_* prefix
///
/// Environment variables follow the pattern `RADACT_<SECTION>_<KEY>`, for
/// example `RADACT_DETECTION_STRATEGY`. Setting an endpoint or key when no
/// `[provider]` section exists creates one with defaults.
fn apply_env_overrides(config: &mut RadactConfig) -> Result<()> {
    const PREFIX: &str = "RADACT_";
    let var = |key: &str| std::env::var(format!("{PREFIX}{key}")).ok();

    if let Some(val) = var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = var("DETECTION_STRATEGY") {
        config.detection.strategy = parse_override("RADACT_DETECTION_STRATEGY", &val)?;
    }
    if let Some(val) = var("DETECTION_CONFIDENCE_THRESHOLD") {
        config.detection.confidence_threshold =
            parse_override("RADACT_DETECTION_CONFIDENCE_THRESHOLD", &val)?;
    }
    if let Some(val) = var("DETECTION_CHUNK_SIZE") {
        config.detection.chunk_size = parse_override("RADACT_DETECTION_CHUNK_SIZE", &val)?;
    }
    if let Some(val) = var("DETECTION_OVERLAP_SIZE") {
        config.detection.overlap_size = parse_override("RADACT_DETECTION_OVERLAP_SIZE", &val)?;
    }
    if let Some(val) = var("DETECTION_MAX_CONCURRENCY") {
        config.detection.max_concurrency =
            parse_override("RADACT_DETECTION_MAX_CONCURRENCY", &val)?;
    }

    if let Some(val) = var("REDACTION_STYLE") {
        config.redaction.style = parse_override("RADACT_REDACTION_STYLE", &val)?;
    }

    let endpoint = var("PROVIDER_ENDPOINT");
    let api_key = var("PROVIDER_API_KEY");
    if config.provider.is_none() && (endpoint.is_some() || api_key.is_some()) {
        config.provider = Some(ProviderConfig::new(String::new(), secret_string("")));
    }
    if let Some(ref mut provider) = config.provider {
        if let Some(val) = endpoint {
            provider.endpoint = val;
        }
        if let Some(val) = api_key {
            provider.api_key = secret_string(val);
        }
        if let Some(val) = var("PROVIDER_DEPLOYMENT") {
            provider.deployment = val;
        }
    }

    Ok(())
}
