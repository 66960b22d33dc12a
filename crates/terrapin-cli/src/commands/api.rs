//! Generic API call: any method against any path under the API base URL.

use std::path::Path;

use anyhow::anyhow;
use terrapin_api::{ApiRequest, parse_method};
use tracing::info;

use crate::cli::ApiArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{
    Output, decode, ensure_success, render_payload, send, unparsed_body, write_failed,
};

/// Printed for a successful response without a body.
pub(crate) const SUCCESS_MESSAGE: &str = "Success.";

pub(crate) async fn handle_api(ctx: &AppContext, out: &mut Output<'_>, args: ApiArgs) -> CliResult<()> {
    let method =
        parse_method(&args.method).map_err(|err| CliError::validation(err.to_string()))?;
    let path = args.path.trim();
    if path.is_empty() {
        return Err(CliError::validation("path must not be empty"));
    }

    let mut request = ApiRequest::new(method, path);
    if let Some(body) = request_body(args.body, args.body_file.as_deref())? {
        request = request.with_body(body);
    }
    info!(method = %request.method, path = %request.path, "api call");

    let response = send(ctx, &request).await?;
    ensure_success(ctx, out, &response)?;

    if response.body_is_blank() {
        return out.line(SUCCESS_MESSAGE).map_err(write_failed);
    }
    match decode(&response.body, |_| {}) {
        Ok((document, payload)) => {
            render_payload(out, &document, &payload).map_err(write_failed)
        }
        Err(error) => unparsed_body(out, &response.body, error),
    }
}

/// Request body from `--body` or `--body-file`, checked to be JSON.
fn request_body(inline: Option<String>, file: Option<&Path>) -> CliResult<Option<Vec<u8>>> {
    let body = match (inline, file) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(path).map_err(|err| {
            CliError::failure(anyhow!(
                "failed to read request body '{}': {err}",
                path.display()
            ))
        })?,
        (None, None) => return Ok(None),
    };
    serde_json::from_slice::<serde_json::Value>(&body)
        .map_err(|err| CliError::validation(format!("request body is not valid JSON: {err}")))?;
    Ok(Some(body))
}
