//! Error types for configuration resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving the service address or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The hostname was empty or carried a scheme, path, or whitespace.
    #[error("invalid hostname '{value}': {reason}")]
    InvalidHostname {
        /// Hostname supplied by the caller.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The address override was not an absolute http(s) URL.
    #[error("invalid address '{value}'")]
    InvalidAddress {
        /// Address supplied by the caller.
        value: String,
        /// URL parse failure, when there was one.
        #[source]
        source: Option<url::ParseError>,
    },
    /// The credentials file exists but could not be read.
    #[error("failed to read credentials file {}", path.display())]
    CredentialsRead {
        /// Credentials file path.
        path: PathBuf,
        /// IO error.
        #[source]
        source: io::Error,
    },
    /// The credentials file is not valid JSON of the expected shape.
    #[error("failed to parse credentials file {}", path.display())]
    CredentialsParse {
        /// Credentials file path.
        path: PathBuf,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}
