//! Builds and issues one authenticated request.

use std::fmt::{self, Debug, Formatter};
use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::request::{ApiRequest, ApiResponse};

/// Media type for JSON:API request and response bodies.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Join a request path onto the API base URL.
///
/// The base URL's own path prefix is kept whether or not it ends in `/`, and a
/// leading `/` on `path` is ignored. Paths that would leave the base URL's
/// origin are rejected so the bearer token is never sent elsewhere.
///
/// # Errors
///
/// Returns [`TransportError::InvalidPath`] or [`TransportError::ForeignPath`].
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, TransportError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    if Url::parse(path).is_ok_and(|url| url.has_host()) {
        return Err(TransportError::ForeignPath {
            path: path.to_string(),
            base: base.to_string(),
        });
    }

    // `./` keeps a first segment containing `:` from reading as a URL scheme.
    let url = base
        .join(&format!("./{}", path.trim_start_matches('/')))
        .map_err(|source| TransportError::InvalidPath {
            path: path.to_string(),
            source,
        })?;

    if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
        return Err(TransportError::ForeignPath {
            path: path.to_string(),
            base: base.to_string(),
        });
    }
    Ok(url)
}

/// Issue `request` and return its status and body.
///
/// Every completed round trip is `Ok`, including 4xx and 5xx responses. The
/// call resolves to [`TransportError::Cancelled`] if `cancel` completes first.
///
/// # Errors
///
/// Returns a [`TransportError`] when the URL cannot be built or the round trip
/// does not complete.
pub async fn execute_api_request<C>(
    client: &Client,
    base_url: &Url,
    token: &str,
    request: &ApiRequest,
    cancel: C,
) -> Result<ApiResponse, TransportError>
where
    C: Future<Output = ()>,
{
    let url = resolve_url(base_url, &request.path)?;
    let url_text = url.to_string();

    let mut builder = client
        .request(request.method.clone(), url)
        .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
        .header(ACCEPT, JSON_API_MEDIA_TYPE);
    if token.is_empty() {
        warn!(url = %url_text, "no API token configured; sending unauthenticated request");
    } else {
        builder = builder.bearer_auth(token);
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    debug!(method = %request.method, url = %url_text, "sending API request");

    let round_trip = async {
        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url_text.clone(),
                source,
            })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body {
                url: url_text.clone(),
                source,
            })?;
        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    };

    tokio::select! {
        biased;
        () = cancel => {
            debug!(url = %url_text, "API request cancelled");
            Err(TransportError::Cancelled { url: url_text.clone() })
        }
        result = round_trip => {
            if let Ok(response) = &result {
                debug!(url = %url_text, status = response.status, bytes = response.body.len(), "API response received");
            }
            result
        }
    }
}

/// HTTP client bound to one base URL and bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    /// Bind `http` to `base_url`, authenticating with `token`.
    pub fn new(http: Client, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    /// API base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token is configured.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Issue `request`; see [`execute_api_request`].
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the round trip does not complete.
    pub async fn execute<C>(
        &self,
        request: &ApiRequest,
        cancel: C,
    ) -> Result<ApiResponse, TransportError>
    where
        C: Future<Output = ()>,
    {
        execute_api_request(&self.http, &self.base_url, &self.token, request, cancel).await
    }
}

impl Debug for ApiClient {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &if self.has_token() { "(sensitive)" } else { "" })
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use reqwest::Method;
    use std::future::pending;

    fn base(server: &MockServer) -> Result<Url> {
        format!("{}/api/v2", server.base_url())
            .parse()
            .map_err(|_| anyhow!("valid URL"))
    }

    #[test]
    fn resolve_url_keeps_base_prefix() -> Result<()> {
        let base: Url = "https://app.example.io/api/v2".parse()?;
        let url = resolve_url(&base, "/organizations/acme")?;
        assert_eq!(url.as_str(), "https://app.example.io/api/v2/organizations/acme");

        let base: Url = "https://app.example.io/api/v2/".parse()?;
        let url = resolve_url(&base, "workspaces?page%5Bsize%5D=5")?;
        assert_eq!(
            url.as_str(),
            "https://app.example.io/api/v2/workspaces?page%5Bsize%5D=5"
        );
        Ok(())
    }

    #[test]
    fn resolve_url_rejects_other_origins() -> Result<()> {
        let base: Url = "https://app.example.io/api/v2/".parse()?;
        let err = resolve_url(&base, "https://evil.example.com/steal").unwrap_err();
        assert!(matches!(err, TransportError::ForeignPath { .. }));

        let err = resolve_url(&base, "../../admin").unwrap_err();
        assert!(matches!(err, TransportError::ForeignPath { .. }));
        Ok(())
    }

    #[test]
    fn resolve_url_treats_colon_segments_as_relative() -> Result<()> {
        let base: Url = "https://app.example.io/api/v2/".parse()?;
        let url = resolve_url(&base, "ws:1")?;
        assert_eq!(url.as_str(), "https://app.example.io/api/v2/ws:1");

        let url = resolve_url(&base, "/runs/run:2/actions/apply")?;
        assert_eq!(url.as_str(), "https://app.example.io/api/v2/runs/run:2/actions/apply");
        Ok(())
    }

    #[tokio::test]
    async fn sends_bearer_token_and_json_api_headers() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/subscriptions/sub-1")
                .header("authorization", "Bearer secret-token")
                .header("content-type", JSON_API_MEDIA_TYPE)
                .header("accept", JSON_API_MEDIA_TYPE);
            then.status(200).body(r#"{"data":{"id":"sub-1","type":"subscriptions"}}"#);
        });

        let response = execute_api_request(
            &Client::new(),
            &base(&server)?,
            "secret-token",
            &ApiRequest::get("subscriptions/sub-1"),
            pending(),
        )
        .await?;

        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body_text(),
            r#"{"data":{"id":"sub-1","type":"subscriptions"}}"#
        );
        Ok(())
    }

    #[tokio::test]
    async fn error_statuses_are_returned_as_responses() -> Result<()> {
        let server = MockServer::start_async().await;
        let body = r#"{"errors":[{"detail":"not found"}]}"#;
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/workspaces/ws-missing");
            then.status(404).body(body);
        });

        let response = execute_api_request(
            &Client::new(),
            &base(&server)?,
            "token",
            &ApiRequest::get("workspaces/ws-missing"),
            pending(),
        )
        .await?;

        assert_eq!(response.status, 404);
        assert_eq!(response.body, body.as_bytes());
        Ok(())
    }

    #[tokio::test]
    async fn sends_request_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/v2/workspaces/ws-1")
                .body(r#"{"data":{"type":"workspaces"}}"#);
            then.status(200).body("{}");
        });

        let client = ApiClient::new(Client::new(), base(&server)?, "token");
        let request = ApiRequest::new(Method::PATCH, "workspaces/ws-1")
            .with_body(r#"{"data":{"type":"workspaces"}}"#);
        let response = client.execute(&request, pending()).await?;

        mock.assert();
        assert!(response.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn empty_token_omits_authorization_header() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/ping").header_missing("authorization");
            then.status(204);
        });

        let client = ApiClient::new(Client::new(), base(&server)?, "");
        let response = client.execute(&ApiRequest::get("ping"), pending()).await?;

        mock.assert();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() -> Result<()> {
        let base: Url = "http://127.0.0.1:9/api/v2/".parse()?;
        let err = execute_api_request(
            &Client::new(),
            &base,
            "token",
            &ApiRequest::get("organizations"),
            pending(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn cancellation_wins_over_a_pending_request() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/slow");
            then.status(200).delay(std::time::Duration::from_secs(5));
        });

        let err = execute_api_request(
            &Client::new(),
            &base(&server)?,
            "token",
            &ApiRequest::get("slow"),
            async {},
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Cancelled { .. }));
        Ok(())
    }

    #[test]
    fn debug_output_hides_token() -> Result<()> {
        let client = ApiClient::new(Client::new(), "https://app.example.io/api/v2/".parse()?, "abc");
        let text = format!("{client:?}");
        assert!(!text.contains("abc"));
        assert!(text.contains("(sensitive)"));
        Ok(())
    }
}
