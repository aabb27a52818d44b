//! Test utilities for Copydeck crates.

use std::path::PathBuf;

use copydeck_common_core::{ContentRow, Worksheet};
use tempfile::TempDir;

pub use proptest;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given name and content.
pub fn temp_file(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Markdown text for a Word document with the given sections and fields.
pub fn word_markdown(sections: &[(&str, &[(&str, &str)])]) -> String {
    let mut out = String::new();
    for (section, fields) in sections {
        out.push_str(&format!("# {section}\n\n"));
        for (label, value) in fields.iter() {
            out.push_str(&format!("{label}: {value}\n\n"));
        }
    }
    out
}

/// A sheet built from string rows.
pub fn sheet(name: &str, rows: &[&[&str]]) -> Worksheet {
    let mut sheet = Worksheet::new(name);
    for row in rows {
        sheet.push_row(row.iter().copied());
    }
    sheet
}

/// Rows for a small two-market project, with one missing and one blank cell.
pub fn sample_rows() -> Vec<ContentRow> {
    vec![
        ContentRow::new("Hero", "Headline")
            .with_content("en-US", "Buy now")
            .with_content("es-MX", "Compra ahora"),
        ContentRow::new("Hero", "Body").with_content("en-US", "Fast and light"),
        ContentRow::new("Hero", "CTA")
            .with_content("en-US", "Shop")
            .with_content("es-MX", ""),
    ]
}

/// Proptest strategies for content model values.
pub mod strategies {
    use proptest::prelude::*;

    /// A well-formed `xx-XX` market code.
    pub fn market_code() -> impl Strategy<Value = String> {
        "[a-z]{2}-[A-Z]{2}"
    }

    /// Copy text without colons or Markdown control characters at either end.
    pub fn copy_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.!?'-]{0,30}[A-Za-z0-9.!?]"
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}
