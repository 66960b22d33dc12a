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

//! Where the service lives and how to authenticate against it.
//!
//! Layout: `address.rs` (hostname and base URL), `credentials.rs` (token
//! sources), `error.rs` (configuration errors).

pub mod address;
pub mod credentials;
pub mod error;

pub use address::{API_BASE_PATH, ClientConfig, DEFAULT_HOSTNAME};
pub use credentials::{
    ChainedTokenSource, CredentialsFile, EnvTokenSource, StaticTokenSource, TokenSource,
    token_env_var,
};
pub use error::{ConfigError, Result};
