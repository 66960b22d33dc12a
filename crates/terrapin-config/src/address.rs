//! Hostname and API base URL resolution.

use url::Url;

use crate::error::{ConfigError, Result};

/// Hostname used when none is configured.
pub const DEFAULT_HOSTNAME: &str = "app.terraform.io";
/// Path prefix of the service API on every host.
pub const API_BASE_PATH: &str = "/api/v2/";

/// Where API requests are sent and which credentials apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    hostname: String,
    base_url: Url,
}

impl ClientConfig {
    /// Resolve the target from a hostname and an optional full address override.
    ///
    /// Without an override the base URL is `https://<hostname>/api/v2/`. With an
    /// override the hostname used for credential lookup is taken from the
    /// override, and an override without a path gets the API base path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostname`] or [`ConfigError::InvalidAddress`].
    pub fn resolve(hostname: &str, address: Option<&str>) -> Result<Self> {
        address
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| Self::from_hostname(hostname), Self::from_address)
    }

    fn from_hostname(hostname: &str) -> Result<Self> {
        let hostname = validate_hostname(hostname)?;
        let base_url = Url::parse(&format!("https://{hostname}{API_BASE_PATH}")).map_err(|_| {
            ConfigError::InvalidHostname {
                value: hostname.to_string(),
                reason: "not a valid host",
            }
        })?;
        Ok(Self {
            hostname: hostname.to_string(),
            base_url,
        })
    }

    fn from_address(address: &str) -> Result<Self> {
        let mut base_url = Url::parse(address).map_err(|source| ConfigError::InvalidAddress {
            value: address.to_string(),
            source: Some(source),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidAddress {
                value: address.to_string(),
                source: None,
            });
        }
        let Some(host) = base_url.host_str() else {
            return Err(ConfigError::InvalidAddress {
                value: address.to_string(),
                source: None,
            });
        };
        let hostname = base_url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));

        if base_url.path() == "/" {
            base_url.set_path(API_BASE_PATH);
        } else if !base_url.path().ends_with('/') {
            let with_slash = format!("{}/", base_url.path());
            base_url.set_path(&with_slash);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(Self { hostname, base_url })
    }

    /// Hostname credentials are looked up for.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn validate_hostname(value: &str) -> Result<&str> {
    let hostname = value.trim();
    let reject = |reason| ConfigError::InvalidHostname {
        value: value.to_string(),
        reason,
    };
    if hostname.is_empty() {
        return Err(reject("must not be empty"));
    }
    if hostname.contains("://") {
        return Err(reject("must not include a scheme"));
    }
    if hostname.contains('/') {
        return Err(reject("must not include a path"));
    }
    if hostname.chars().any(char::is_whitespace) {
        return Err(reject("must not contain whitespace"));
    }
    Ok(hostname)
}
