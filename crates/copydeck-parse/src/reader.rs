//! Decoders that turn stored artifacts into blocks and sheets.
//!
//! Word documents are read as Markdown: `#` headings and plain paragraphs.
//! Workbooks are read as a directory holding one CSV file per sheet, the
//! sheet named after the file stem.

use std::path::Path;

use copydeck_common_core::{Block, Cell, Workbook, Worksheet};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use tracing::debug;

use crate::error::ReadError;

/// Decodes a document's bytes into its heading/paragraph stream.
pub trait BlockReader: Send + Sync {
    fn read_blocks(&self, bytes: &[u8]) -> Result<Vec<Block>, ReadError>;
}

/// Decodes a stored workbook into its sheets.
pub trait WorkbookReader: Send + Sync {
    fn read_workbook(&self, path: &Path) -> Result<Workbook, ReadError>;
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Markdown document reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReader;

enum Pending {
    Heading(u8, String),
    Paragraph(String),
}

impl Pending {
    fn text_mut(&mut self) -> &mut String {
        match self {
            Self::Heading(_, text) | Self::Paragraph(text) => text,
        }
    }

    fn finish(self) -> Block {
        match self {
            Self::Heading(level, text) => Block::heading(level, text.trim()),
            Self::Paragraph(text) => Block::paragraph(text),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl BlockReader for MarkdownReader {
    fn read_blocks(&self, bytes: &[u8]) -> Result<Vec<Block>, ReadError> {
        if bytes.starts_with(ZIP_MAGIC) {
            return Err(ReadError(
                "binary .docx containers are not supported; export the document as Markdown"
                    .to_string(),
            ));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ReadError(format!("document is not valid UTF-8: {e}")))?;

        let mut blocks = Vec::new();
        let mut pending: Option<Pending> = None;

        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    pending = Some(Pending::Heading(heading_level(level), String::new()));
                }
                Event::Start(Tag::Paragraph) => {
                    pending = Some(Pending::Paragraph(String::new()));
                }
                Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) => {
                    if let Some(block) = pending.take() {
                        blocks.push(block.finish());
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some(block) = pending.as_mut() {
                        block.text_mut().push_str(&t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(block) = pending.as_mut() {
                        block.text_mut().push('\n');
                    }
                }
                _ => {}
            }
        }

        debug!(blocks = blocks.len(), "Decoded document blocks");
        Ok(blocks)
    }
}

/// Reader for a directory of `<sheet name>.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWorkbookReader;

impl CsvWorkbookReader {
    /// Decode one CSV sheet.
    pub fn read_sheet(name: &str, data: &[u8]) -> Result<Worksheet, ReadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut sheet = Worksheet::new(name);
        for record in reader.records() {
            let record = record?;
            sheet.rows.push(record.iter().map(Cell::from).collect());
        }
        Ok(sheet)
    }
}

impl WorkbookReader for CsvWorkbookReader {
    fn read_workbook(&self, path: &Path) -> Result<Workbook, ReadError> {
        if !path.is_dir() {
            return Err(ReadError(format!(
                "{} is not a workbook directory",
                path.display()
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        entries.sort();

        let mut workbook = Workbook::default();
        for entry in entries {
            let name = entry
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = std::fs::read(&entry)?;
            workbook.sheets.push(Self::read_sheet(&name, &data)?);
        }

        debug!(path = %path.display(), sheets = workbook.sheets.len(), "Decoded workbook");
        Ok(workbook)
    }
}
