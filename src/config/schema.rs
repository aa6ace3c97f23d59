//! Configuration schema types

use crate::config::SecretString;
use crate::redaction::config::{AuditConfig, DetectionConfig, TokenConfig};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use url::Url;

/// Main Radact configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadactConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Redaction token settings
    #[serde(default)]
    pub redaction: TokenConfig,

    /// Entity recognition provider (required for provider/hybrid strategies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// Audit log settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RadactConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid, or if the
    /// detection strategy needs a provider and none is configured.
    pub fn validate(&self) -> Result<(), String> {
        self.validate_sections()?;

        if self.provider.is_none() && self.detection.strategy.requires_provider() {
            return Err(format!(
                "provider configuration is required when detection.strategy = '{}'",
                self.detection.strategy
            ));
        }
        Ok(())
    }

    /// Validates every present section without requiring `[provider]`.
    ///
    /// Used when a provider implementation is injected directly.
    pub fn validate_sections(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;
        self.redaction.validate()?;
        if let Some(ref provider) = self.provider {
            provider.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in logs and reports
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for provider calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err("provider.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "provider.retry.initial_delay_ms must not exceed max_delay_ms".to_string(),
            );
        }
        Ok(())
    }
}

/// Token pricing used for cost tracking and estimates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingConfig {
    /// USD per 1,000 prompt tokens
    #[serde(default = "default_input_cost_per_1k")]
    pub input_cost_per_1k: f64,

    /// USD per 1,000 completion tokens
    #[serde(default = "default_output_cost_per_1k")]
    pub output_cost_per_1k: f64,

    /// Warn when one call costs more than this (USD)
    #[serde(default = "default_cost_alert_threshold")]
    pub cost_alert_threshold: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            input_cost_per_1k: default_input_cost_per_1k(),
            output_cost_per_1k: default_output_cost_per_1k(),
            cost_alert_threshold: default_cost_alert_threshold(),
        }
    }
}

impl PricingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.input_cost_per_1k < 0.0 || self.output_cost_per_1k < 0.0 {
            return Err("provider.pricing costs must not be negative".to_string());
        }
        if self.cost_alert_threshold < 0.0 {
            return Err("provider.pricing.cost_alert_threshold must not be negative".to_string());
        }
        Ok(())
    }
}

/// Azure OpenAI provider configuration (`[provider]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    #[serde(default)]
    pub endpoint: String,

    /// API key, zeroized on drop and never serialized
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// Model deployment name
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token limit per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Pricing used for cost tracking
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl ProviderConfig {
    /// Create a provider config with defaults for everything but credentials
    pub fn new(endpoint: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            deployment: default_deployment(),
            api_version: default_api_version(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
            pricing: PricingConfig::default(),
        }
    }

    /// Validates the provider section
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("provider.endpoint cannot be empty".to_string());
        }

        let url = Url::parse(&self.endpoint)
            .map_err(|e| format!("provider.endpoint is not a valid URL: {e}"))?;
        if url.scheme() != "https" {
            return Err("provider.endpoint must start with https://".to_string());
        }

        if self.api_key.expose_secret().is_blank() {
            return Err("provider.api_key cannot be empty".to_string());
        }

        if self.deployment.trim().is_empty() {
            return Err("provider.deployment cannot be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "provider.temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("provider.max_tokens must be > 0".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("provider.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        self.pricing.validate()?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_app_name() -> String {
    "radact".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_input_cost_per_1k() -> f64 {
    0.000150
}

fn default_output_cost_per_1k() -> f64 {
    0.000600
}

fn default_cost_alert_threshold() -> f64 {
    1.0
}

fn default_deployment() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
