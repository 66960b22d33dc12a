//! Error types for request execution and response parsing.

use terrapin_output::RecordError;
use thiserror::Error;

/// The HTTP round trip never completed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request path could not be joined onto the base URL.
    #[error("invalid request path '{path}'")]
    InvalidPath {
        /// Path supplied by the caller.
        path: String,
        /// URL parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The request path resolved to a different origin than the base URL.
    #[error("request path '{path}' resolves outside {base}")]
    ForeignPath {
        /// Path supplied by the caller.
        path: String,
        /// Base URL the path was joined onto.
        base: String,
    },
    /// Sending the request or receiving the response head failed.
    #[error("request to {url} failed")]
    Request {
        /// Absolute URL of the request.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body could not be read to completion.
    #[error("reading response body from {url} failed")]
    Body {
        /// Absolute URL of the request.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The caller cancelled the request before it completed.
    #[error("request to {url} was cancelled")]
    Cancelled {
        /// Absolute URL of the request.
        url: String,
    },
}

/// The response body is not a JSON:API resource document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not JSON at all.
    #[error("response body is not valid JSON")]
    InvalidJson {
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The top-level value is not an object.
    #[error("response document is not a JSON object")]
    NotAnObject,
    /// The document has no `data` member.
    #[error("response document has no top-level \"data\" member")]
    MissingData,
    /// `data` is neither a resource object nor an array of them.
    #[error("\"data\" must be an object or an array, found {found}")]
    UnexpectedData {
        /// JSON kind that was found instead.
        found: &'static str,
    },
    /// An element of `data` is not an object.
    #[error("resource {index} is not a JSON object")]
    ResourceNotObject {
        /// Position within `data`.
        index: usize,
    },
    /// A resource lacks `id` or `type`.
    #[error("resource {index} is missing \"{field}\"")]
    MissingField {
        /// Position within `data`.
        index: usize,
        /// Missing member name.
        field: &'static str,
    },
    /// `attributes` is present but is not an object.
    #[error("resource {index} has non-object \"attributes\"")]
    AttributesNotObject {
        /// Position within `data`.
        index: usize,
    },
    /// An attribute name collides with another field of the record.
    #[error("resource {index} has conflicting field names")]
    ConflictingField {
        /// Position within `data`.
        index: usize,
        /// Record construction failure.
        #[source]
        source: RecordError,
    },
}
