//! Projecting wide rows onto one market's tall document form.

use copydeck_common_core::{
    market_content, CellState, ContentRow, DocumentMetadata, ParsedField, ParsedSection,
    ParsedWordDocument,
};
use serde::{Deserialize, Serialize};

/// A field of a market projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallField {
    pub name: String,
    /// Text for the market, empty when missing or blank.
    pub content: String,
    /// Whether the market had an entry for this field at all.
    pub seen: bool,
}

/// A deliverable section of a market projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallSection {
    pub name: String,
    pub fields: Vec<TallField>,
}

/// One market's view of the row set, grouped by deliverable in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallDocument {
    pub market: String,
    pub sections: Vec<TallSection>,
}

impl TallDocument {
    /// Convert into the parsed document shape, dropping unseen and blank fields.
    pub fn into_parsed(self, filename: impl Into<String>) -> ParsedWordDocument {
        ParsedWordDocument {
            market: self.market,
            sections: self
                .sections
                .into_iter()
                .map(|section| ParsedSection {
                    name: section.name,
                    fields: section
                        .fields
                        .into_iter()
                        .filter(|f| !f.content.trim().is_empty())
                        .map(|f| ParsedField::verbatim(f.name, f.content))
                        .collect(),
                })
                .collect(),
            metadata: DocumentMetadata::now(filename),
        }
    }
}

/// Project rows onto a single market.
pub fn project_market(rows: &[ContentRow], market: &str) -> TallDocument {
    let mut sections: Vec<TallSection> = Vec::new();

    for (row, item) in rows.iter().zip(market_content(rows, market)) {
        let field = TallField {
            name: item.field,
            content: item.content,
            seen: !matches!(row.cell(market), CellState::Missing),
        };
        match sections.iter_mut().find(|s| s.name == item.deliverable) {
            Some(section) => section.fields.push(field),
            None => sections.push(TallSection {
                name: item.deliverable,
                fields: vec![field],
            }),
        }
    }

    TallDocument {
        market: market.to_string(),
        sections,
    }
}

/// Independent projections for every market, in the order given.
pub fn project_all(rows: &[ContentRow], markets: &[String]) -> Vec<TallDocument> {
    markets.iter().map(|m| project_market(rows, m)).collect()
}
