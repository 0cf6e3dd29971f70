//! Result type alias for Rosterflow

use super::errors::RosterError;

/// Result type alias for Rosterflow operations
///
/// # Examples
///
/// ```
/// use rosterflow::domain::result::Result;
/// use rosterflow::domain::errors::RosterError;
///
/// fn checked_count(count: usize) -> Result<usize> {
///     if count == 0 {
///         return Err(RosterError::InvalidArgument("count must be at least 1".to_string()));
///     }
///     Ok(count)
/// }
///
/// assert!(checked_count(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, RosterError>;
