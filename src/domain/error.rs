//! Error types for the notepane plugin.
//!
//! [`NotepaneError`] covers failures that abort an operation inside the plugin
//! itself (configuration, theme loading, I/O, payload decoding). Remote API
//! failures are *not* represented here: they are classified into
//! [`GatewayError`](crate::gateway::GatewayError) values and flow through the
//! cache and mutation coordinator as data.

use thiserror::Error;

/// The main error type for notepane operations.
///
/// # Examples
///
/// ```
/// use notepane::NotepaneError;
///
/// fn check_per_page(per_page: u32) -> Result<(), NotepaneError> {
///     if per_page == 0 {
///         return Err(NotepaneError::Config("per_page must be positive".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check_per_page(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum NotepaneError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON payload could not be encoded or decoded.
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// A response arrived for a request the plugin never issued.
    ///
    /// Usually harmless (a response racing a plugin reload) and only logged.
    #[error("Unknown request id: {0}")]
    UnknownRequest(u64),
}

/// A specialized `Result` type for notepane operations.
pub type Result<T> = std::result::Result<T, NotepaneError>;
