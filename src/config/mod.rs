//! Configuration management for Radact.
//!
//! Radact uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `RADACT_*` environment overrides
//! - Default values for every section
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detection]
//! strategy = "hybrid"
//! confidence_threshold = 0.8
//! categories = ["names", "phone_numbers", "emails", "ssn"]
//!
//! [redaction]
//! style = "standard"
//!
//! [provider]
//! endpoint = "https://my-resource.openai.azure.com"
//! api_key = "${AZURE_OPENAI_API_KEY}"
//! deployment = "gpt-4o-mini"
//! ```
//!
//! ```rust,no_run
//! use radact::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("radact.toml")?;
//! println!("Strategy: {}", config.detection.strategy);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, PricingConfig, ProviderConfig, RadactConfig, RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
