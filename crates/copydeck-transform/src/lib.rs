//! Copydeck shape transforms.
//!
//! Three representations of the same copy are kept in step here: catalog
//! selections, the wide row set (one row per field, one column per market)
//! and per-market tall documents. This crate builds the wide form from
//! either of the others, projects it back out per market, shapes both for
//! emission and writes the resulting artifacts.

pub mod completeness;
pub mod emit;
pub mod error;
pub mod markets;
pub mod project;
pub mod tall;
pub mod wide;
pub mod writer;

pub use completeness::{validate_completeness, CompletenessIssue, IncompleteKind};
pub use emit::{copy_sheet, requirements_sheet, word_blocks, WordFraming};
pub use error::{TransformError, TransformResult};
pub use markets::{order_markets, MarketSelection};
pub use project::{LocalizationProject, MarketDocument, WORD_DOCUMENTS_DIR};
pub use tall::{project_all, project_market, TallDocument, TallField, TallSection};
pub use wide::{assemble_from_documents, merge_same_market, rows_from_catalog, Assembly};
pub use writer::{render_markdown, write_document, write_workbook};
