//! Bearer token sources keyed by hostname.
//!
//! Tokens are only ever read here; nothing in this module writes or caches
//! credentials.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variable overriding the credentials file location.
pub const CREDENTIALS_FILE_ENV: &str = "TERRAPIN_CREDENTIALS_FILE";
/// Environment variable holding a token for any host.
pub const FALLBACK_TOKEN_ENV: &str = "TERRAPIN_TOKEN";

/// Supplies the bearer token for a hostname.
pub trait TokenSource {
    /// Token for `hostname`, if one is configured.
    fn get_token(&self, hostname: &str) -> Option<String>;
}

/// Name of the per-host token variable: `TF_TOKEN_` followed by the hostname
/// with `-` replaced by `__` and `.` replaced by `_`.
#[must_use]
pub fn token_env_var(hostname: &str) -> String {
    let mut name = String::from("TF_TOKEN_");
    for ch in hostname.chars() {
        match ch {
            '-' => name.push_str("__"),
            '.' | ':' => name.push('_'),
            other => name.push(other),
        }
    }
    name
}

/// Tokens from environment variables captured at construction.
#[derive(Clone, Default)]
pub struct EnvTokenSource {
    vars: HashMap<String, String>,
}

impl EnvTokenSource {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Use an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl TokenSource for EnvTokenSource {
    fn get_token(&self, hostname: &str) -> Option<String> {
        self.non_empty(&token_env_var(hostname))
            .or_else(|| self.non_empty(FALLBACK_TOKEN_ENV))
    }
}

impl Debug for EnvTokenSource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EnvTokenSource")
            .field("vars", &self.vars.len())
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsDocument {
    #[serde(default)]
    credentials: HashMap<String, HostCredentials>,
}

#[derive(Debug, Deserialize)]
struct HostCredentials {
    token: String,
}

/// Tokens stored in a JSON credentials file.
///
/// The file holds `{"credentials": {"<hostname>": {"token": "..."}}}`.
#[derive(Clone, Default)]
pub struct CredentialsFile {
    tokens: HashMap<String, String>,
}

impl CredentialsFile {
    /// Default file location: `$TERRAPIN_CREDENTIALS_FILE`, else
    /// `~/.terraform.d/credentials.tfrc.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CREDENTIALS_FILE_ENV).filter(|value| !value.is_empty())
        {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".terraform.d").join("credentials.tfrc.json"))
    }

    /// Load the file at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "credentials file not found");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::CredentialsRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::CredentialsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file at [`CredentialsFile::default_path`], if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self> {
        Self::default_path().map_or_else(|| Ok(Self::default()), |path| Self::load(&path))
    }

    fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let document: CredentialsDocument = serde_json::from_str(text)?;
        Ok(Self {
            tokens: document
                .credentials
                .into_iter()
                .map(|(host, credentials)| (host.to_ascii_lowercase(), credentials.token))
                .collect(),
        })
    }
}

impl TokenSource for CredentialsFile {
    fn get_token(&self, hostname: &str) -> Option<String> {
        self.tokens
            .get(&hostname.to_ascii_lowercase())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

impl Debug for CredentialsFile {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let mut hosts: Vec<&String> = self.tokens.keys().collect();
        hosts.sort();
        formatter
            .debug_struct("CredentialsFile")
            .field("hosts", &hosts)
            .finish()
    }
}

/// A single token returned for every host.
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Wrap `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn get_token(&self, _hostname: &str) -> Option<String> {
        Some(self.token.trim().to_string()).filter(|token| !token.is_empty())
    }
}

impl Debug for StaticTokenSource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("StaticTokenSource(..)")
    }
}

/// Asks each source in turn; the first token found wins.
#[derive(Default)]
pub struct ChainedTokenSource {
    sources: Vec<Box<dyn TokenSource + Send + Sync>>,
}

impl ChainedTokenSource {
    /// Empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority source.
    #[must_use]
    pub fn with(mut self, source: impl TokenSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl TokenSource for ChainedTokenSource {
    fn get_token(&self, hostname: &str) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| source.get_token(hostname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn token_env_var_follows_host_encoding() {
        assert_eq!(token_env_var("app.terraform.io"), "TF_TOKEN_app_terraform_io");
        assert_eq!(token_env_var("tfe-prod.example.com"), "TF_TOKEN_tfe__prod_example_com");
        assert_eq!(token_env_var("127.0.0.1:8080"), "TF_TOKEN_127_0_0_1_8080");
    }

    #[test]
    fn env_source_prefers_host_specific_token() {
        let source = EnvTokenSource::from_vars([
            ("TF_TOKEN_app_terraform_io", "host-token"),
            (FALLBACK_TOKEN_ENV, "fallback-token"),
        ]);
        assert_eq!(
            source.get_token("app.terraform.io").as_deref(),
            Some("host-token")
        );
        assert_eq!(
            source.get_token("other.example.com").as_deref(),
            Some("fallback-token")
        );
    }

    #[test]
    fn env_source_ignores_blank_values() {
        let source = EnvTokenSource::from_vars([("TF_TOKEN_app_terraform_io", "  ")]);
        assert!(source.get_token("app.terraform.io").is_none());
        assert!(!format!("{source:?}").contains("TF_TOKEN"));
    }

    #[test]
    fn credentials_file_loads_tokens_by_host() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("credentials.tfrc.json");
        fs::write(
            &path,
            r#"{"credentials":{"App.Terraform.io":{"token":"file-token"},"tfe.local":{"token":""}}}"#,
        )?;

        let file = CredentialsFile::load(&path)?;
        assert_eq!(
            file.get_token("app.terraform.io").as_deref(),
            Some("file-token")
        );
        assert!(file.get_token("tfe.local").is_none());
        assert!(file.get_token("missing.example.com").is_none());
        assert!(!format!("{file:?}").contains("file-token"));
        Ok(())
    }

    #[test]
    fn missing_credentials_file_is_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = CredentialsFile::load(&dir.path().join("absent.json"))?;
        assert!(file.get_token("app.terraform.io").is_none());
        Ok(())
    }

    #[test]
    fn malformed_credentials_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("credentials.tfrc.json");
        fs::write(&path, "credentials = {}")?;
        let err = CredentialsFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::CredentialsParse { .. }));
        Ok(())
    }

    #[test]
    fn chain_returns_first_token_found() {
        let chain = ChainedTokenSource::new()
            .with(EnvTokenSource::from_vars(Vec::<(String, String)>::new()))
            .with(StaticTokenSource::new("static"))
            .with(StaticTokenSource::new("never"));
        assert_eq!(chain.get_token("any").as_deref(), Some("static"));
        assert!(ChainedTokenSource::new().get_token("any").is_none());
    }

    #[test]
    fn static_source_hides_token_in_debug() {
        let source = StaticTokenSource::new("secret");
        assert!(!format!("{source:?}").contains("secret"));
        assert!(StaticTokenSource::new(" ").get_token("host").is_none());
    }
}
