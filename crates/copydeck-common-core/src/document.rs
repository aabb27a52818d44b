//! Parsed Word document shape (tall form).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-market document recovered from a heading/paragraph stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedWordDocument {
    /// Market code detected from the filename, or [`crate::UNKNOWN_MARKET`].
    pub market: String,
    /// Sections in document order.
    pub sections: Vec<ParsedSection>,
    pub metadata: DocumentMetadata,
}

/// A level-1 heading and the fields found beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSection {
    /// Heading text; matches a catalog section name when the document follows the template.
    pub name: String,
    pub fields: Vec<ParsedField>,
}

/// A single `label: value` paragraph after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedField {
    pub name: String,
    pub content: String,
    /// Reconciliation confidence in `[0, 1]`.
    pub confidence: f64,
    /// Label as written in the document, kept when reconciliation changed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
}

impl ParsedField {
    /// A field taken verbatim from the document.
    pub fn verbatim(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            confidence: 1.0,
            original_name: None,
        }
    }
}

/// Provenance for a parsed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub parsed_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

impl DocumentMetadata {
    /// Metadata stamped with the current time and no warnings.
    pub fn now(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            parsed_at: Utc::now(),
            warnings: Vec::new(),
        }
    }
}

impl ParsedWordDocument {
    /// Total number of fields across all sections.
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}
