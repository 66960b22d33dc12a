//! Shared client construction, credential lookup, and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use terrapin_api::{ApiClient, ApplicationError};
use terrapin_config::{
    ChainedTokenSource, ClientConfig, CredentialsFile, EnvTokenSource, StaticTokenSource,
    TokenSource,
};
use terrapin_output::FormatMode;
use tracing::debug;

use crate::cli::Cli;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) hostname: String,
    pub(crate) format: FormatMode,
}

impl AppContext {
    /// Resolve the target host, credentials and HTTP client from parsed flags.
    pub(crate) fn from_cli(cli: &Cli, request_id: &str) -> CliResult<Self> {
        let config = ClientConfig::resolve(&cli.hostname, cli.address.as_deref())
            .map_err(|err| CliError::validation(err.to_string()))?;
        let token = resolve_token(cli.token.as_deref(), config.hostname())?;
        let http = build_http_client(Duration::from_secs(cli.timeout), request_id)?;
        debug!(
            hostname = config.hostname(),
            base_url = %config.base_url(),
            authenticated = !token.is_empty(),
            "client configured"
        );

        Ok(Self {
            api: ApiClient::new(http, config.base_url().clone(), token),
            hostname: config.hostname().to_string(),
            format: cli.output,
        })
    }
}

/// Build the reqwest client shared by every request of one invocation.
pub(crate) fn build_http_client(timeout: Duration, request_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(request_id).map_err(|_| {
        CliError::failure(anyhow!("request identifier contains invalid characters"))
    })?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(timeout)
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Token for `hostname`: the `--token` flag, then the environment, then the
/// credentials file. An empty string means the call is made anonymously.
pub(crate) fn resolve_token(flag: Option<&str>, hostname: &str) -> CliResult<String> {
    resolve_token_with(flag, hostname, CredentialsFile::load_default)
}

/// The credentials file is only read when neither the flag nor the environment
/// has a token.
fn resolve_token_with(
    flag: Option<&str>,
    hostname: &str,
    load_credentials: impl FnOnce() -> terrapin_config::Result<CredentialsFile>,
) -> CliResult<String> {
    let mut chain = ChainedTokenSource::new();
    if let Some(token) = flag {
        chain = chain.with(StaticTokenSource::new(token));
    }
    let chain = chain.with(EnvTokenSource::from_env());
    if let Some(token) = chain.get_token(hostname) {
        return Ok(token);
    }

    let credentials = load_credentials()
        .context("failed to load credentials file")
        .map_err(CliError::failure)?;
    Ok(credentials.get_token(hostname).unwrap_or_default())
}

/// Turn a non-2xx response into a CLI failure carrying the service's detail and a hint.
pub(crate) fn application_failure(error: &ApplicationError, hostname: &str) -> CliError {
    // The first line gets its `Error: ` prefix from the top-level reporter.
    let mut message = format!("{} (status {})", error.messages.join("\nError: "), error.status);
    if let Some(hint) = error.hint(hostname) {
        message = format!("{message}\nhint: {hint}");
    }
    CliError::failure(anyhow!(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrapin_api::ApiResponse;

    fn failure_for(status: u16, body: &str) -> CliError {
        let response = ApiResponse {
            status,
            body: body.as_bytes().to_vec(),
        };
        let error = ApplicationError::from_response(&response).unwrap();
        application_failure(&error, "app.terraform.io")
    }

    #[test]
    fn exit_codes_distinguish_validation_from_failure() {
        assert_eq!(CliError::validation("bad flag").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::validation("bad flag").display_message(), "bad flag");
    }

    #[test]
    fn not_found_failure_carries_detail_and_hint() {
        let err = failure_for(404, r#"{"errors":[{"status":"404","title":"not found","detail":"not found"}]}"#);
        assert_eq!(err.exit_code(), 3);
        let message = err.display_message();
        assert!(message.starts_with("not found (status 404)"), "{message}");
        assert!(message.contains(
            "hint: the resource may not exist, or the feature may not be available for this organization"
        ));
    }

    #[test]
    fn unauthorized_failure_names_the_host() {
        let message = failure_for(401, "").display_message();
        assert!(message.starts_with("request failed with status 401"), "{message}");
        assert!(message.contains("configured for app.terraform.io"));
    }

    #[test]
    fn server_errors_have_no_hint() {
        let message = failure_for(500, "upstream exploded").display_message();
        assert_eq!(message, "upstream exploded (status 500)");
        assert!(!message.contains("hint:"));
    }

    #[test]
    fn multiple_error_objects_are_listed_line_by_line() {
        let message = failure_for(
            422,
            r#"{"errors":[{"detail":"name is taken"},{"title":"invalid email"}]}"#,
        )
        .display_message();
        assert_eq!(message, "name is taken\nError: invalid email (status 422)");
    }

    #[test]
    fn flag_token_takes_precedence() -> CliResult<()> {
        assert_eq!(resolve_token(Some("from-flag"), "127.0.0.1:1")?, "from-flag");
        Ok(())
    }

    #[test]
    fn broken_credentials_file_only_matters_without_a_token() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("credentials.tfrc.json");
        std::fs::write(&path, "{ not json")?;
        let load = || CredentialsFile::load(&path);

        let token = resolve_token_with(Some("from-flag"), "creds.invalid", load)
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(token, "from-flag");

        let err = resolve_token_with(None, "creds.invalid", load).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("failed to load credentials file"));
        Ok(())
    }

    #[test]
    fn http_client_rejects_invalid_request_id() {
        assert!(build_http_client(Duration::from_secs(1), "bad\nid").is_err());
        assert!(build_http_client(Duration::from_secs(1), "7f1c").is_ok());
    }
}
