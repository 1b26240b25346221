//! Error types for the rolesearch library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! is the [`RoleSearchError`] enum. Each variant carries a stable kind label
//! (see [`RoleSearchError::kind`]) so callers can report errors in a
//! structured form without matching on the enum.
//!
//! # Examples
//!
//! ```
//! use rolesearch::error::{Result, RoleSearchError};
//!
//! fn check_top_k(top_k: usize) -> Result<()> {
//!     if top_k == 0 {
//!         return Err(RoleSearchError::configuration("top_k must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_top_k(0).unwrap_err();
//! assert_eq!(err.kind(), "configuration_error");
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rolesearch operations.
#[derive(Error, Debug)]
pub enum RoleSearchError {
    /// Invalid, caller-correctable parameters (weights, top_k, chunk window).
    /// Rejected before any work is done.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required back-end has not been built or loaded. Fatal to the
    /// request; never retried automatically.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// Tokenization or embedding failed mid-query. The query is aborted
    /// without partial results.
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// An entity lookup missed. Only the CLI surfaces this as an error; the
    /// library lookup path returns `Option` instead.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors raised while reading corpus files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON errors raised while parsing corpus files.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with [`RoleSearchError`].
pub type Result<T> = std::result::Result<T, RoleSearchError>;

impl RoleSearchError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        RoleSearchError::Configuration(msg.into())
    }

    /// Create a new index-unavailable error.
    pub fn index_unavailable<S: Into<String>>(msg: S) -> Self {
        RoleSearchError::IndexUnavailable(msg.into())
    }

    /// Create a new scoring error.
    pub fn scoring<S: Into<String>>(msg: S) -> Self {
        RoleSearchError::Scoring(msg.into())
    }

    /// Create a new not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        RoleSearchError::NotFound(msg.into())
    }

    /// Stable machine-readable label for this error's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RoleSearchError::Configuration(_) => "configuration_error",
            RoleSearchError::IndexUnavailable(_) => "index_unavailable_error",
            RoleSearchError::Scoring(_) => "scoring_error",
            RoleSearchError::NotFound(_) => "not_found_error",
            RoleSearchError::Io(_) => "io_error",
            RoleSearchError::Json(_) => "json_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoleSearchError::configuration("overlap must be less than max_tokens");
        assert_eq!(
            err.to_string(),
            "Configuration error: overlap must be less than max_tokens"
        );

        let err = RoleSearchError::index_unavailable("embedder not fitted");
        assert_eq!(err.to_string(), "Index unavailable: embedder not fitted");
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(
            RoleSearchError::configuration("x").kind(),
            "configuration_error"
        );
        assert_eq!(
            RoleSearchError::index_unavailable("x").kind(),
            "index_unavailable_error"
        );
        assert_eq!(RoleSearchError::scoring("x").kind(), "scoring_error");
        assert_eq!(RoleSearchError::not_found("x").kind(), "not_found_error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing corpus");
        let err: RoleSearchError = io_err.into();
        assert_eq!(err.kind(), "io_error");
    }
}
