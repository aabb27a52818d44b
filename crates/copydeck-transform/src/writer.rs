//! Artifact writers: Markdown documents and CSV-per-sheet workbooks.
//!
//! Output is read back by the Markdown and CSV readers of the parse crate.

use std::path::{Path, PathBuf};

use copydeck_common_core::{Block, Workbook, Worksheet};
use tracing::debug;

use crate::error::{TransformError, TransformResult};

/// Extension of written documents.
pub const DOCUMENT_EXTENSION: &str = "md";

const ESCAPED: &[char] = &[
    '\\', '`', '*', '_', '[', ']', '<', '>', '#', '&', '|', '~', '!', '=', '-', '+',
];

fn escape_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    for (i, ch) in line.chars().enumerate() {
        let list_marker = digits > 0 && i == digits && (ch == '.' || ch == ')');
        if ESCAPED.contains(&ch) || list_marker {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape text for a Markdown paragraph; line breaks become hard breaks.
fn escape_paragraph(text: &str) -> String {
    text.lines()
        .map(|line| escape_line(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\\\n")
}

/// Render blocks as Markdown.
pub fn render_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let level = usize::from((*level).clamp(1, 6));
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&escape_line(text.trim()));
            }
            Block::Paragraph { text } => out.push_str(&escape_paragraph(text)),
        }
        out.push_str("\n\n");
    }
    out
}

fn write_file(path: &Path, contents: &[u8]) -> TransformResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TransformError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a document as `<dir>/<stem>.md`, returning its path.
pub fn write_document(dir: &Path, stem: &str, blocks: &[Block]) -> TransformResult<PathBuf> {
    let path = dir.join(format!("{stem}.{DOCUMENT_EXTENSION}"));
    write_file(&path, render_markdown(blocks).as_bytes())?;
    debug!(path = %path.display(), blocks = blocks.len(), "Wrote document");
    Ok(path)
}

/// Encode one sheet as CSV.
pub fn encode_sheet(sheet: &Worksheet) -> TransformResult<Vec<u8>> {
    let encode_err = |source| TransformError::Encode {
        sheet: sheet.name.clone(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in &sheet.rows {
        writer
            .write_record(row.iter().map(|cell| cell.as_text()))
            .map_err(encode_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| encode_err(csv::Error::from(e.into_error())))
}

/// Write a workbook as `<dir>/<stem>/<sheet>.csv`, returning the workbook directory.
pub fn write_workbook(dir: &Path, stem: &str, workbook: &Workbook) -> TransformResult<PathBuf> {
    let book_dir = dir.join(stem);
    for sheet in &workbook.sheets {
        let path = book_dir.join(format!("{}.csv", sheet.name));
        write_file(&path, &encode_sheet(sheet)?)?;
    }
    debug!(path = %book_dir.display(), sheets = workbook.sheets.len(), "Wrote workbook");
    Ok(book_dir)
}
