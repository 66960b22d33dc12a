#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Raw authenticated calls against the service's JSON:API endpoints.
//!
//! # Design
//! - One request per call; no retries, pagination, or caching.
//! - A completed round trip is always `Ok`, whatever its status code. Only a
//!   round trip that never completed is a [`TransportError`].
//! - Parsing is a separate step so callers can fall back to the raw body.

pub mod error;
pub mod executor;
pub mod parser;
pub mod problem;
pub mod request;

pub use error::{ParseError, TransportError};
pub use executor::{ApiClient, JSON_API_MEDIA_TYPE, execute_api_request, resolve_url};
pub use parser::{PayloadShape, ResourcePayload, parse_api_response, parse_document};
pub use problem::ApplicationError;
pub use request::{ApiRequest, ApiResponse, UnsupportedMethod, parse_method};
