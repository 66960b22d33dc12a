//! Command handlers and the request/response plumbing they share.

pub(crate) mod api;
pub(crate) mod resource;

use std::io::{self, Write};

use serde_json::Value;
use terrapin_api::{
    ApiRequest, ApiResponse, ApplicationError, ParseError, PayloadShape, ResourcePayload,
    parse_document,
};
use terrapin_output::{FormatMode, Formatter};

use crate::client::{AppContext, CliError, CliResult, application_failure};

/// Output sink handed to every handler.
pub(crate) type Output<'a> = Formatter<&'a mut (dyn Write + Send)>;

/// Issue `request`, giving up when the user interrupts the process.
pub(crate) async fn send(ctx: &AppContext, request: &ApiRequest) -> CliResult<ApiResponse> {
    ctx.api
        .execute(request, interrupted())
        .await
        .map_err(CliError::failure)
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel.
        std::future::pending::<()>().await;
    }
}

/// Fail on a non-2xx response. JSON mode echoes the error body to stdout first.
pub(crate) fn ensure_success(
    ctx: &AppContext,
    out: &mut Output<'_>,
    response: &ApiResponse,
) -> CliResult<()> {
    let Some(error) = ApplicationError::from_response(response) else {
        return Ok(());
    };
    if out.mode() == FormatMode::Json {
        out.raw(&response.body).map_err(write_failed)?;
    }
    Err(application_failure(&error, &ctx.hostname))
}

/// Decode a response body, keeping the document alongside its records.
///
/// `prepare` may rewrite the document (e.g. redaction) before records are built.
pub(crate) fn decode(
    body: &[u8],
    prepare: impl FnOnce(&mut Value),
) -> Result<(Value, ResourcePayload), ParseError> {
    let mut document: Value =
        serde_json::from_slice(body).map_err(|source| ParseError::InvalidJson { source })?;
    prepare(&mut document);
    let payload = parse_document(&document)?;
    Ok((document, payload))
}

/// Handle a body that is not a resource document: JSON mode prints it verbatim,
/// table mode fails.
pub(crate) fn unparsed_body(out: &mut Output<'_>, body: &[u8], error: ParseError) -> CliResult<()> {
    tracing::debug!(error = %error, "response is not a resource document");
    match out.mode() {
        FormatMode::Json => out.raw(body).map_err(write_failed),
        FormatMode::Table => Err(CliError::failure(
            anyhow::Error::new(error).context("failed to parse response"),
        )),
    }
}

/// Print a parsed payload: one record as key/value lines, several as blocks.
pub(crate) fn render_payload(
    out: &mut Output<'_>,
    document: &Value,
    payload: &ResourcePayload,
) -> io::Result<()> {
    match out.mode() {
        FormatMode::Json => out.document(document),
        FormatMode::Table => match payload.records() {
            [record] if payload.shape() == PayloadShape::Single => {
                out.key_value(record)
            }
            records => out.key_values(records),
        },
    }
}

pub(crate) fn write_failed(err: io::Error) -> CliError {
    CliError::failure(anyhow::Error::new(err).context("failed to write output"))
}
