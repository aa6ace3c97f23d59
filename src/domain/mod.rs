//! Domain types for Radact.
//!
//! The domain layer provides the crate-wide error hierarchy ([`RadactError`],
//! [`ProviderError`]) and the [`Result`] alias used by every fallible operation.
//!
//! ```rust
//! use radact::domain::{RadactError, Result};
//!
//! fn example() -> Result<()> {
//!     let _config = radact::config::load_config("radact.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{ProviderError, RadactError};
pub use result::Result;
