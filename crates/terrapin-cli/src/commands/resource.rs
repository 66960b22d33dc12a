//! Read, list, and delete handlers driven by the resource descriptor table.

use terrapin_api::ApiRequest;
use tracing::info;

use crate::cli::ResourceCommand;
use crate::client::{AppContext, CliResult};
use crate::commands::{
    Output, decode, ensure_success, render_payload, send, unparsed_body, write_failed,
};
use crate::output::{list_rows, redact_body, redact_document};
use crate::resources::ResourceDescriptor;

pub(crate) async fn handle_resource(
    ctx: &AppContext,
    out: &mut Output<'_>,
    descriptor: &ResourceDescriptor,
    command: ResourceCommand,
) -> CliResult<()> {
    match command {
        ResourceCommand::Read { id } => handle_read(ctx, out, descriptor, &id).await,
        ResourceCommand::List { parent } => {
            handle_list(ctx, out, descriptor, parent.as_deref()).await
        }
        ResourceCommand::Delete { id } => handle_delete(ctx, out, descriptor, &id).await,
    }
}

async fn handle_read(
    ctx: &AppContext,
    out: &mut Output<'_>,
    descriptor: &ResourceDescriptor,
    id: &str,
) -> CliResult<()> {
    let request = ApiRequest::get(descriptor.member_path(id)?);
    let response = send(ctx, &request).await?;
    ensure_success(ctx, out, &response)?;

    let (document, payload) = match decode(&response.body, redact_document) {
        Ok(decoded) => decoded,
        Err(error) => return unparsed_body(out, &redact_body(&response.body), error),
    };
    render_payload(out, &document, &payload).map_err(write_failed)
}

async fn handle_list(
    ctx: &AppContext,
    out: &mut Output<'_>,
    descriptor: &ResourceDescriptor,
    parent: Option<&str>,
) -> CliResult<()> {
    let request = ApiRequest::get(descriptor.collection_path(parent)?);
    let response = send(ctx, &request).await?;
    ensure_success(ctx, out, &response)?;

    let records = match decode(&response.body, redact_document) {
        Ok((_, payload)) => payload.into_records(),
        Err(error) => return unparsed_body(out, &redact_body(&response.body), error),
    };
    info!(resource = descriptor.name, count = records.len(), "listed resources");

    let (rows, full_rows) = list_rows(&records, descriptor.columns);
    let headers = descriptor.columns.iter().map(|column| column.header);
    out.table_with_full_rows(headers, rows, full_rows)
        .map_err(write_failed)
}

async fn handle_delete(
    ctx: &AppContext,
    out: &mut Output<'_>,
    descriptor: &ResourceDescriptor,
    id: &str,
) -> CliResult<()> {
    descriptor.ensure_deletable()?;
    let request = ApiRequest::delete(descriptor.member_path(id)?);
    let response = send(ctx, &request).await?;
    ensure_success(ctx, out, &response)?;

    info!(resource = descriptor.name, id, "deleted resource");
    out.line(&format!("Deleted {} {}.", descriptor.name, id.trim()))
        .map_err(write_failed)
}
