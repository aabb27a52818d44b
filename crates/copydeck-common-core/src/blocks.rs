//! Decoded document stream shared by the Word reader and writer.

use serde::{Deserialize, Serialize};

/// One block of a decoded word-processing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// A heading; level 1 is the outermost.
    Heading { level: u8, text: String },
    /// A body paragraph's plain text.
    Paragraph { text: String },
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    /// The block's text regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } => text,
        }
    }
}
