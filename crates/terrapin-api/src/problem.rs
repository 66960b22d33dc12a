//! Server-supplied failure detail from non-2xx responses.

use std::fmt::{self, Display, Formatter};

use reqwest::StatusCode;
use serde::Deserialize;

use crate::request::ApiResponse;

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    source: Option<ErrorSource>,
}

#[derive(Debug, Deserialize)]
struct ErrorSource {
    #[serde(default)]
    pointer: Option<String>,
}

/// A completed round trip whose status signals failure.
///
/// This is ordinary data produced from an [`ApiResponse`]; the executor never
/// returns it as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable messages, one per JSON:API error object.
    pub messages: Vec<String>,
}

impl ApplicationError {
    /// Extract failure detail from `response`, or `None` for a 2xx response.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Option<Self> {
        if response.is_success() {
            return None;
        }

        let mut messages = serde_json::from_slice::<ErrorDocument>(&response.body)
            .map(|document| {
                document
                    .errors
                    .into_iter()
                    .filter_map(error_object_message)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if messages.is_empty() {
            let text = response.body_text();
            let text = text.trim();
            messages.push(if text.is_empty() {
                status_line(response.status)
            } else {
                text.to_string()
            });
        }

        Some(Self {
            status: response.status,
            messages,
        })
    }

    /// Suggestion for statuses with a common cause.
    #[must_use]
    pub fn hint(&self, hostname: &str) -> Option<String> {
        match self.status {
            401 => Some(format!(
                "check that a valid API token is configured for {hostname}"
            )),
            403 => Some("the token may lack permission for this operation".to_string()),
            404 => Some(
                "the resource may not exist, or the feature may not be available for this organization"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl Display for ApplicationError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} (status {})",
            self.messages.join("; "),
            self.status
        )
    }
}

impl std::error::Error for ApplicationError {}

fn error_object_message(error: ErrorObject) -> Option<String> {
    let text = error
        .detail
        .filter(|detail| !detail.trim().is_empty())
        .or_else(|| error.title.filter(|title| !title.trim().is_empty()))
        .or_else(|| {
            error.status.map(|status| match status {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            })
        })?;

    match error.source.and_then(|source| source.pointer) {
        Some(pointer) if !pointer.is_empty() => Some(format!("{text} (at {pointer})")),
        _ => Some(text),
    }
}

fn status_line(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(
            || format!("request failed with status {status}"),
            |reason| format!("request failed with status {status} {reason}"),
        )
}
