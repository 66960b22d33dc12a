//! Request and response values exchanged with the executor.

use std::borrow::Cow;

use reqwest::Method;
use thiserror::Error;

/// One HTTP call against the service, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL, optionally with a query string.
    pub path: String,
    /// Raw request body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Outcome of a completed round trip. No interpretation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the body holds nothing but whitespace.
    #[must_use]
    pub fn body_is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Returned for methods the CLI does not issue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported HTTP method '{value}' (expected GET, POST, PATCH, PUT, or DELETE)")]
pub struct UnsupportedMethod {
    /// Method supplied by the caller.
    pub value: String,
}

/// Parse a method name, ignoring case.
///
/// # Errors
///
/// Returns [`UnsupportedMethod`] for anything but GET, POST, PATCH, PUT, or DELETE.
pub fn parse_method(value: &str) -> Result<Method, UnsupportedMethod> {
    match value.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PATCH" => Ok(Method::PATCH),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(UnsupportedMethod {
            value: value.to_string(),
        }),
    }
}
