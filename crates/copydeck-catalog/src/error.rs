//! Catalog errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading or querying reference data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {what} data: {message}")]
    Parse { what: &'static str, message: String },

    #[error("catalog integrity violation in '{deliverable}': {message}")]
    Integrity { deliverable: String, message: String },

    #[error("duplicate market code: {0}")]
    DuplicateMarket(String),

    #[error("unknown deliverable: {0}")]
    UnknownDeliverable(String),
}
