//! Standardized error handling for the anonset crates
//!
//! Selection itself only fails on malformed input ([`ValidationError`]).
//! Everything around it (loading configuration, writing logs, serializing
//! reports) reports through [`AnonsetError`], which keeps the failing
//! operation as context and the underlying error as source.
//!
//! # Usage
//!
//! ```
//! use anonset_common::error::{AnonsetResult, ErrorContext};
//!
//! fn read_settings(path: &str) -> AnonsetResult<String> {
//!     let content = std::fs::read_to_string(path)
//!         .context(format!("Failed to read {}", path))?;
//!     Ok(content)
//! }
//!
//! assert!(read_settings("/definitely/not/here.toml").is_err());
//! ```

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

use crate::validation::ValidationError;

/// The main error type of the anonset crates
#[derive(Debug, Error)]
pub enum AnonsetError {
    /// Malformed coins, payments or parameters
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error("Configuration error: {context}")]
    Config {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// I/O errors
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

/// Type alias for a Result with AnonsetError
pub type AnonsetResult<T> = Result<T, AnonsetError>;

/// Extension trait for adding context to error types
pub trait ErrorContext<T> {
    /// Replace the context of the error, keeping its kind and source
    fn context(self, context: impl Into<String>) -> AnonsetResult<T>;
}

impl<T, E: Into<AnonsetError>> ErrorContext<T> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> AnonsetResult<T> {
        self.map_err(|err| match err.into() {
            AnonsetError::Config { source, .. } => AnonsetError::Config {
                context: context.into(),
                source,
            },
            AnonsetError::Io { source, .. } => AnonsetError::Io {
                context: context.into(),
                source,
            },
            AnonsetError::Serialization { source, .. } => AnonsetError::Serialization {
                context: context.into(),
                source,
            },
            // Validation messages already say what was wrong
            err @ AnonsetError::Validation(_) => err,
        })
    }
}

impl From<io::Error> for AnonsetError {
    fn from(err: io::Error) -> Self {
        AnonsetError::Io {
            context: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AnonsetError {
    fn from(err: serde_json::Error) -> Self {
        AnonsetError::Serialization {
            context: format!("JSON serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for AnonsetError {
    fn from(err: toml::de::Error) -> Self {
        AnonsetError::Serialization {
            context: format!("TOML deserialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for AnonsetError {
    fn from(err: toml::ser::Error) -> Self {
        AnonsetError::Serialization {
            context: format!("TOML serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

/// Create a new configuration error with context
pub fn config_error<S: Into<String>>(context: S) -> AnonsetError {
    AnonsetError::Config {
        context: context.into(),
        source: None,
    }
}

/// Create a new configuration error with context and source
pub fn config_error_with_source<S: Into<String>, E: StdError + Send + Sync + 'static>(
    context: S,
    source: E,
) -> AnonsetError {
    AnonsetError::Config {
        context: context.into(),
        source: Some(Box::new(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_replaces_message_and_keeps_source() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.context("Failed to open config").unwrap_err();

        assert_eq!(err.to_string(), "I/O error: Failed to open config");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validation_errors_keep_their_message() {
        let result: Result<(), ValidationError> =
            Err(ValidationError::DuplicateCoin("a".to_string()));
        let err = result.context("ignored").unwrap_err();

        assert_eq!(err.to_string(), "Validation error: Duplicate coin: a");
    }

    #[test]
    fn test_config_error_with_source() {
        let err = config_error_with_source("bad tier", ValidationError::InvalidParameter("x".into()));
        assert!(matches!(err, AnonsetError::Config { .. }));
        assert!(err.source().is_some());
        assert!(config_error("plain").source().is_none());
    }
}
