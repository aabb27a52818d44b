//! Wide-form content rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel market code for documents whose market could not be detected.
pub const UNKNOWN_MARKET: &str = "unknown";

/// One field's content across every market of a project.
///
/// A market that is absent from `content` has never been seen for this
/// field. A market that is present with an empty string was seen and left
/// blank. Emitters decide how each case is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    /// Deliverable (section) name, the first column of the copy tab.
    pub deliverable: String,
    /// Field name, the second column of the copy tab.
    pub field: String,
    /// Market code to localized text.
    pub content: IndexMap<String, String>,
}

/// State of a single market cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState<'a> {
    /// No content was ever discovered for this market.
    Missing,
    /// The market is present but its text is empty or whitespace.
    Blank,
    /// The market carries text.
    Filled(&'a str),
}

impl ContentRow {
    /// Create a row with no market content.
    pub fn new(deliverable: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            deliverable: deliverable.into(),
            field: field.into(),
            content: IndexMap::new(),
        }
    }

    /// Builder-style content insertion.
    pub fn with_content(mut self, market: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(market, text);
        self
    }

    /// Set the text for a market, replacing any previous value.
    pub fn set(&mut self, market: impl Into<String>, text: impl Into<String>) {
        self.content.insert(market.into(), text.into());
    }

    /// The `(deliverable, field)` identity of this row.
    pub fn key(&self) -> (&str, &str) {
        (&self.deliverable, &self.field)
    }

    /// Text for a market, empty when the market was never seen.
    pub fn content_for(&self, market: &str) -> &str {
        self.content.get(market).map(String::as_str).unwrap_or("")
    }

    /// Classify the cell for a market.
    pub fn cell(&self, market: &str) -> CellState<'_> {
        match self.content.get(market) {
            None => CellState::Missing,
            Some(text) if text.trim().is_empty() => CellState::Blank,
            Some(text) => CellState::Filled(text),
        }
    }
}

/// A row projected onto a single market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketContent {
    pub deliverable: String,
    pub field: String,
    pub content: String,
}

/// Project every row onto one market, substituting empty text for absent cells.
pub fn market_content(rows: &[ContentRow], market: &str) -> Vec<MarketContent> {
    rows.iter()
        .map(|row| MarketContent {
            deliverable: row.deliverable.clone(),
            field: row.field.clone(),
            content: row.content_for(market).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_states() {
        let row = ContentRow::new("Hero", "Headline")
            .with_content("en-US", "Buy now")
            .with_content("fr-FR", "  ");

        assert_eq!(row.cell("en-US"), CellState::Filled("Buy now"));
        assert_eq!(row.cell("fr-FR"), CellState::Blank);
        assert_eq!(row.cell("de-DE"), CellState::Missing);
        assert_eq!(row.content_for("de-DE"), "");
    }

    #[test]
    fn test_content_keeps_insertion_order() {
        let row = ContentRow::new("Hero", "Body")
            .with_content("fr-FR", "a")
            .with_content("en-US", "b");
        let markets: Vec<_> = row.content.keys().cloned().collect();
        assert_eq!(markets, vec!["fr-FR", "en-US"]);
    }

    #[test]
    fn test_market_content_projection() {
        let rows = vec![
            ContentRow::new("Hero", "Headline").with_content("en-US", "Hi"),
            ContentRow::new("Hero", "Body"),
        ];
        let projected = market_content(&rows, "en-US");
        assert_eq!(projected[0].content, "Hi");
        assert_eq!(projected[1].content, "");
    }
}
