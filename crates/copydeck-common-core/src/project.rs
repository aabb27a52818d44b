//! Project data tagged by the shape it was imported from.

use serde::{Deserialize, Serialize};

use crate::document::ParsedWordDocument;
use crate::template::ParsedExcelTemplate;

/// Imported project content, decided once at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ProjectData {
    /// Tall form from one (possibly merged) Word document.
    Word(ParsedWordDocument),
    /// Wide form from an Excel template.
    Excel(ParsedExcelTemplate),
}

impl ProjectData {
    /// Markets covered by the project.
    pub fn markets(&self) -> Vec<String> {
        match self {
            Self::Word(doc) => vec![doc.market.clone()],
            Self::Excel(template) => template.markets.clone(),
        }
    }

    /// Number of content items: rows for Excel, sections for Word.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Word(doc) => doc.sections.len(),
            Self::Excel(template) => template.rows.len(),
        }
    }

    /// Parse warnings carried by the underlying shape.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Word(doc) => &doc.metadata.warnings,
            Self::Excel(template) => &template.metadata.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMetadata, ParsedField, ParsedSection};

    #[test]
    fn test_word_origin_is_tagged() {
        let project = ProjectData::Word(ParsedWordDocument {
            market: "en-US".into(),
            sections: vec![ParsedSection {
                name: "Hero".into(),
                fields: vec![ParsedField::verbatim("Headline", "Hi")],
            }],
            metadata: DocumentMetadata::now("copy_en-US.docx"),
        });

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["origin"], "word");
        assert_eq!(project.markets(), vec!["en-US"]);
        assert_eq!(project.item_count(), 1);
    }
}
