//! Building the wide row set from catalog selections or per-market documents.

use copydeck_catalog::DeliverableTemplate;
use copydeck_common_core::{ContentRow, ParsedWordDocument};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// One empty row per catalog slot, in catalog traversal order.
///
/// Every market cell starts out missing.
pub fn rows_from_catalog(deliverables: &[&DeliverableTemplate]) -> Vec<ContentRow> {
    deliverables
        .iter()
        .flat_map(|d| d.slots())
        .map(|(section, field)| ContentRow::new(section, field))
        .collect()
}

/// Concatenate documents that carry the same market.
///
/// Returns one document per market, in order of first appearance.
pub fn merge_same_market(documents: Vec<ParsedWordDocument>) -> Vec<ParsedWordDocument> {
    let mut by_market: IndexMap<String, ParsedWordDocument> = IndexMap::new();
    for document in documents {
        match by_market.get_mut(&document.market) {
            Some(existing) => {
                existing.sections.extend(document.sections);
                existing
                    .metadata
                    .warnings
                    .extend(document.metadata.warnings);
            }
            None => {
                by_market.insert(document.market.clone(), document);
            }
        }
    }
    by_market.into_values().collect()
}

/// Wide rows assembled from per-market documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Markets in order of first appearance.
    pub markets: Vec<String>,
    pub rows: Vec<ContentRow>,
    /// Warnings carried over from every document.
    pub warnings: Vec<String>,
}

/// Assemble one row per `(section, field)` key seen in any document.
///
/// A market whose document lacks a key gets an empty string for it. Row
/// order follows the first document that mentions each key.
pub fn assemble_from_documents(documents: Vec<ParsedWordDocument>) -> Assembly {
    let documents = merge_same_market(documents);
    let markets: Vec<String> = documents.iter().map(|d| d.market.clone()).collect();

    let mut rows: IndexMap<(String, String), ContentRow> = IndexMap::new();
    let mut warnings = Vec::new();

    for document in &documents {
        warnings.extend(document.metadata.warnings.iter().cloned());
        for section in &document.sections {
            for field in &section.fields {
                let row = rows
                    .entry((section.name.clone(), field.name.clone()))
                    .or_insert_with(|| ContentRow::new(&section.name, &field.name));
                if row.content.contains_key(&document.market) {
                    let label = field.original_name.as_deref().unwrap_or(&field.name);
                    warn!(
                        market = %document.market,
                        section = %section.name,
                        field = %field.name,
                        "Duplicate field overwrites earlier value"
                    );
                    warnings.push(format!(
                        "Duplicate field: \"{label}\" → \"{}\" in {} ({}) overwrites an earlier value",
                        field.name, section.name, document.market
                    ));
                }
                row.set(&document.market, &field.content);
            }
        }
    }

    let mut rows: Vec<ContentRow> = rows.into_values().collect();
    for row in &mut rows {
        for market in &markets {
            if !row.content.contains_key(market) {
                row.set(market.clone(), String::new());
            }
        }
    }

    debug!(
        markets = markets.len(),
        rows = rows.len(),
        "Assembled wide rows from documents"
    );
    Assembly {
        markets,
        rows,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copydeck_catalog::Catalog;
    use copydeck_common_core::{DocumentMetadata, ParsedField, ParsedSection};

    fn document(market: &str, sections: &[(&str, &[(&str, &str)])]) -> ParsedWordDocument {
        ParsedWordDocument {
            market: market.to_string(),
            sections: sections
                .iter()
                .map(|(name, fields)| ParsedSection {
                    name: name.to_string(),
                    fields: fields
                        .iter()
                        .map(|(n, c)| ParsedField::verbatim(*n, *c))
                        .collect(),
                })
                .collect(),
            metadata: DocumentMetadata::now(format!("copy_{market}.docx")),
        }
    }

    #[test]
    fn test_rows_from_catalog_follow_traversal_order() {
        let catalog = Catalog::builtin().unwrap();
        let selected = catalog.select(&["Social Ad"]).unwrap();
        let rows = rows_from_catalog(&selected);
        let keys: Vec<_> = rows.iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                ("Social Ad", "headline"),
                ("Social Ad", "body"),
                ("Social Ad", "cta"),
                ("Social Ad", "legal"),
            ]
        );
        assert!(rows.iter().all(|r| r.content.is_empty()));
    }

    #[test]
    fn test_missing_key_becomes_empty_string() {
        let assembly = assemble_from_documents(vec![
            document("en-US", &[("Hero", &[("Headline", "Buy"), ("Body", "Fast")])]),
            document("fr-FR", &[("Hero", &[("Headline", "Achetez")])]),
        ]);

        assert_eq!(assembly.markets, vec!["en-US", "fr-FR"]);
        assert_eq!(assembly.rows.len(), 2);
        let body = &assembly.rows[1];
        assert_eq!(body.key(), ("Hero", "Body"));
        assert_eq!(body.content.get("fr-FR"), Some(&String::new()));
    }

    #[test]
    fn test_same_market_documents_merge() {
        let assembly = assemble_from_documents(vec![
            document("en-US", &[("Hero", &[("Headline", "Buy")])]),
            document("fr-FR", &[("Hero", &[("Headline", "Achetez")])]),
            document("en-US", &[("Gallery 1", &[("Body", "Slide")])]),
        ]);
        assert_eq!(assembly.markets, vec!["en-US", "fr-FR"]);
        let keys: Vec<_> = assembly.rows.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec![("Hero", "Headline"), ("Gallery 1", "Body")]);
        assert_eq!(assembly.rows[1].content_for("en-US"), "Slide");
        assert_eq!(assembly.rows[1].content_for("fr-FR"), "");
    }

    #[test]
    fn test_duplicate_key_keeps_later_value_with_warning() {
        let mut doc = document("en-US", &[("Hero", &[("Headline", "First")])]);
        doc.sections[0].fields.push(ParsedField {
            name: "Headline".into(),
            content: "Second".into(),
            confidence: 0.8,
            original_name: Some("Title".into()),
        });

        let assembly = assemble_from_documents(vec![doc]);
        assert_eq!(assembly.rows.len(), 1);
        assert_eq!(assembly.rows[0].content_for("en-US"), "Second");
        assert_eq!(
            assembly.warnings,
            vec!["Duplicate field: \"Title\" → \"Headline\" in Hero (en-US) overwrites an earlier value"]
        );
    }

    #[test]
    fn test_same_key_across_markets_is_not_a_duplicate() {
        let assembly = assemble_from_documents(vec![
            document("en-US", &[("Hero", &[("Headline", "Buy")])]),
            document("fr-FR", &[("Hero", &[("Headline", "Achetez")])]),
        ]);
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn test_warnings_concatenate() {
        let mut a = document("en-US", &[]);
        a.metadata.warnings.push("one".into());
        let mut b = document("en-US", &[]);
        b.metadata.warnings.push("two".into());
        let merged = merge_same_market(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].metadata.warnings, vec!["one", "two"]);
    }
}
