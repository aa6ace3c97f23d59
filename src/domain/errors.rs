//! Domain error types
//!
//! This module defines the error hierarchy for Radact. Errors are domain-specific
//! and never expose third-party types such as `reqwest::Error` to callers.

use thiserror::Error;

/// Main Radact error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum RadactError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entity recognition provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Detection errors (pattern compilation, detector construction)
    #[error("Detection error: {0}")]
    Detection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Entity recognition provider errors
///
/// Errors raised while calling the remote recognition service. A chunk whose
/// provider call fails yields zero entities; these errors never abort a whole
/// redaction.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to connect to the provider
    #[error("Failed to connect to provider: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response could not be parsed into entities
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Whether a retry with backoff can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::ConnectionFailed(_)
                | ProviderError::RateLimitExceeded(_)
                | ProviderError::ServerError { .. }
                | ProviderError::Timeout(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RadactError {
    fn from(err: std::io::Error) -> Self {
        RadactError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RadactError {
    fn from(err: serde_json::Error) -> Self {
        RadactError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RadactError {
    fn from(err: toml::de::Error) -> Self {
        RadactError::Configuration(format!("TOML parse error: {err}"))
    }
}
