//! Parse errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A file that could not be parsed as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub filename: String,
    pub error: String,
}

/// Errors raised while decoding or interpreting an uploaded file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse {filename}: {cause}")]
    DocumentParse { filename: String, cause: String },

    #[error("Invalid Excel structure. {0}")]
    InvalidStructure(String),

    #[error("No market columns found in Excel file")]
    NoMarketColumns,

    #[error("{0} tab is empty")]
    EmptySheet(String),

    #[error("No valid sheets found in Excel file")]
    NoSheets,

    #[error("Could not parse any of the {} uploaded files", failures.len())]
    NoFilesParsed { failures: Vec<FileFailure> },

    #[error("Too many files: {count} uploaded, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },
}

impl ParseError {
    /// Whether the error concerns the file's layout rather than its encoding.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidStructure(_) | Self::NoMarketColumns | Self::EmptySheet(_) | Self::NoSheets
        )
    }
}

/// Failure to decode raw bytes or files into blocks or sheets.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ReadError(pub String);

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        Self(err.to_string())
    }
}
