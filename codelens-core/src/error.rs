//! Error types for Codelens

use std::time::Duration;

use thiserror::Error;

/// Result type alias for Codelens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed underlying cause carried by provider failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for Codelens operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Configuration error (missing credential, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or provider-side failure
    #[error("Failed to get review from {provider}. Please check your API key and try again.")]
    Provider {
        /// Name of the provider that failed
        provider: &'static str,
        /// The underlying cause
        #[source]
        source: BoxError,
    },

    /// The provider answered, but not with a usable review
    #[error("Malformed response from AI: {0}")]
    MalformedResponse(String),

    /// The provider did not answer within the configured bound
    #[error("Review request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl Error {
    /// Wrap an underlying failure as a provider error
    pub fn provider(provider: &'static str, source: impl Into<BoxError>) -> Self {
        Error::Provider {
            provider,
            source: source.into(),
        }
    }
}
