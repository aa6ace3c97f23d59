//! Result type alias for Radact

use super::errors::RadactError;

/// Result type alias for Radact operations
///
/// # Examples
///
/// ```
/// use radact::domain::result::Result;
/// use radact::domain::errors::RadactError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RadactError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RadactError>;
