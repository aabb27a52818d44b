//! Word document parser: heading/paragraph stream to per-market sections.

use std::sync::{Arc, OnceLock};

use copydeck_catalog::ReferenceData;
use copydeck_common_core::{
    Block, DocumentMetadata, ParsedField, ParsedSection, ParsedWordDocument, UNKNOWN_MARKET,
};
use regex::Regex;
use tracing::{debug, info};

use crate::error::{ParseError, ParseResult};
use crate::input::UploadedFile;
use crate::reader::{BlockReader, MarkdownReader};
use crate::reconcile::{low_confidence_warning, FieldReconciler};

fn market_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)_([a-z]{2}-[a-z]{2})\.(?:docx|md)$").expect("valid market pattern")
    })
}

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)^(.+?):\s*(.*)$").expect("valid field pattern"))
}

/// Market code from a `..._xx-XX.docx` filename, or the unknown sentinel.
pub fn detect_market(filename: &str) -> String {
    market_pattern()
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_MARKET.to_string())
}

/// Split a paragraph into a trimmed `label: value` pair.
///
/// Paragraphs without a colon, or whose label or value is blank, yield `None`.
pub fn split_field(text: &str) -> Option<(&str, &str)> {
    let caps = field_pattern().captures(text)?;
    let label = caps.get(1)?.as_str().trim();
    let value = caps.get(2)?.as_str().trim();
    if label.is_empty() || value.is_empty() {
        return None;
    }
    Some((label, value))
}

/// Collect level-1 sections and their field paragraphs from a block stream.
fn collect_sections(blocks: &[Block]) -> Vec<ParsedSection> {
    let mut sections = Vec::new();
    let mut current: Option<ParsedSection> = None;

    for block in blocks {
        match block {
            Block::Heading { level: 1, text } => {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                current = Some(ParsedSection {
                    name: text.trim().to_string(),
                    fields: Vec::new(),
                });
            }
            Block::Heading { .. } => {}
            Block::Paragraph { text } => {
                let Some(section) = current.as_mut() else {
                    continue;
                };
                if let Some((label, value)) = split_field(text) {
                    section.fields.push(ParsedField::verbatim(label, value));
                }
            }
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }
    sections
}

/// Parses Word documents into [`ParsedWordDocument`]s.
#[derive(Clone)]
pub struct WordParser {
    reference: Arc<ReferenceData>,
    reader: Arc<dyn BlockReader>,
}

impl std::fmt::Debug for WordParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordParser").finish_non_exhaustive()
    }
}

impl WordParser {
    /// Parser using the Markdown block reader.
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self::with_reader(reference, Arc::new(MarkdownReader))
    }

    pub fn with_reader(reference: Arc<ReferenceData>, reader: Arc<dyn BlockReader>) -> Self {
        Self { reference, reader }
    }

    /// Decode and parse an uploaded document.
    pub fn parse(&self, file: &UploadedFile) -> ParseResult<ParsedWordDocument> {
        let blocks = self
            .reader
            .read_blocks(&file.bytes)
            .map_err(|e| ParseError::DocumentParse {
                filename: file.name.clone(),
                cause: e.to_string(),
            })?;
        Ok(self.parse_blocks(&file.name, &blocks))
    }

    /// Parse an already decoded block stream.
    pub fn parse_blocks(&self, filename: &str, blocks: &[Block]) -> ParsedWordDocument {
        let market = detect_market(filename);
        let reconciler = FieldReconciler::new(&self.reference.synonyms);
        let mut metadata = DocumentMetadata::now(filename);

        let mut sections = collect_sections(blocks);
        for section in &mut sections {
            let Some((deliverable, expected)) = self.reference.catalog.find_section(&section.name)
            else {
                debug!(section = %section.name, "Section not in catalog, fields kept verbatim");
                continue;
            };
            debug!(
                section = %section.name,
                deliverable = %deliverable.name,
                "Reconciling section fields"
            );
            let expected = expected.expected_fields();
            section.fields = std::mem::take(&mut section.fields)
                .into_iter()
                .map(|field| reconciler.reconcile_field(field, &expected))
                .collect();
        }

        metadata.warnings.extend(
            sections
                .iter()
                .flat_map(|s| s.fields.iter())
                .filter_map(low_confidence_warning),
        );

        let document = ParsedWordDocument {
            market,
            sections,
            metadata,
        };
        info!(
            filename,
            market = %document.market,
            sections = document.sections.len(),
            fields = document.field_count(),
            warnings = document.metadata.warnings.len(),
            "Parsed Word document"
        );
        document
    }
}

/// Merge documents for one market: concatenated sections and warnings.
///
/// A single document is returned unchanged. Otherwise the first document's
/// market is kept and the filename records how many were merged.
pub fn merge_documents(mut documents: Vec<ParsedWordDocument>) -> Option<ParsedWordDocument> {
    if documents.len() <= 1 {
        return documents.pop();
    }

    let count = documents.len();
    let mut iter = documents.into_iter();
    let mut merged = iter.next()?;
    merged.metadata.filename = format!("{count} documents");
    for document in iter {
        merged.sections.extend(document.sections);
        merged.metadata.warnings.extend(document.metadata.warnings);
    }
    Some(merged)
}
