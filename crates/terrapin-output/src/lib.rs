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

//! Ordered records and the renderers that print them.
//!
//! Layout:
//! - `record.rs`: the ordered key/value container every command renders
//! - `mode.rs`: output format selection
//! - `table.rs`: header/row normalisation for tabular output
//! - `render.rs`: table and JSON render strategies
//! - `formatter.rs`: the facade commands print through

pub mod error;
pub mod formatter;
pub mod mode;
pub mod record;
pub mod render;
pub mod table;

pub use error::RecordError;
pub use formatter::Formatter;
pub use mode::{FormatMode, UnknownFormatMode};
pub use record::Record;
pub use render::{JsonRenderer, Render, TableRenderer, display_value};
pub use table::TableSpec;
