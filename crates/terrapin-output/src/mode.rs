//! Output format selection.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Encoding used for everything a command prints to standard output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormatMode {
    /// Column-aligned, human-readable text.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl FormatMode {
    /// Flag spelling of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl Display for FormatMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returned when a format string names neither `table` nor `json`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown output format '{value}' (expected 'table' or 'json')")]
pub struct UnknownFormatMode {
    /// Value supplied by the caller.
    pub value: String,
}

impl FromStr for FormatMode {
    type Err = UnknownFormatMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormatMode {
                value: value.to_string(),
            }),
        }
    }
}
