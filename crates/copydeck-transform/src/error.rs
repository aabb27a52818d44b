//! Transform errors.

use std::path::PathBuf;

use copydeck_catalog::CatalogError;
use thiserror::Error;

/// Result alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors raised while shaping or writing project artifacts.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("at least one market must be selected")]
    EmptyMarketSelection,

    #[error("at least one deliverable must be selected")]
    EmptyDeliverableSelection,

    #[error("lead market '{0}' is not among the selected markets")]
    LeadNotSelected(String),

    #[error("no documents to assemble")]
    NoDocuments,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode sheet '{sheet}': {source}")]
    Encode {
        sheet: String,
        #[source]
        source: csv::Error,
    },
}
