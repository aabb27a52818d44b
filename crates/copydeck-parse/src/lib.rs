//! Copydeck parsers.
//!
//! Word documents are decoded into a heading/paragraph stream and read into
//! per-market sections, with field labels reconciled against the catalog.
//! Excel templates are decoded into sheets and read into wide content rows.
//! Batches of documents are parsed independently so one bad file never
//! sinks the rest.

pub mod batch;
pub mod error;
pub mod excel;
pub mod input;
pub mod reader;
pub mod reconcile;
pub mod word;

pub use batch::{parse_word_batch, BatchOutcome};
pub use error::{FileFailure, ParseError, ParseResult, ReadError};
pub use excel::{ExcelParser, COPY_TAB, REQUIREMENTS_TAB};
pub use input::UploadedFile;
pub use reader::{BlockReader, CsvWorkbookReader, MarkdownReader, WorkbookReader};
pub use reconcile::{FieldMatch, FieldReconciler, LOW_CONFIDENCE};
pub use word::{detect_market, merge_documents, WordParser};
