//! External system integrations for Radact.
//!
//! - [`provider`] - remote entity recognition (Azure OpenAI chat completions)
//!
//! Adapters isolate network dependencies behind traits so the redaction core
//! can be tested with in-process mock implementations:
//!
//! ```rust,no_run
//! use radact::adapters::provider::{AzureOpenAiProvider, EntityRecognitionProvider};
//! use radact::config::{secret_string, ProviderConfig};
//! use std::sync::Arc;
//!
//! # fn example() -> radact::domain::Result<()> {
//! let config = ProviderConfig::new(
//!     "https://my-resource.openai.azure.com",
//!     secret_string("api-key"),
//! );
//! let provider: Arc<dyn EntityRecognitionProvider> = Arc::new(AzureOpenAiProvider::new(config)?);
//! # Ok(())
//! # }
//! ```

pub mod provider;
