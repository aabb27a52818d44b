//! Parsed Excel template shape (wide form).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content::ContentRow;

/// A localization workbook recovered from its copy and requirements tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedExcelTemplate {
    /// Market codes in header order.
    pub markets: Vec<String>,
    pub rows: Vec<ContentRow>,
    /// Rows indexed by deliverable, in first-seen order.
    pub grouped: IndexMap<String, DeliverableGroup>,
    pub requirements: Vec<AssetRequirement>,
    pub project_name: String,
    pub metadata: TemplateMetadata,
}

/// Display grouping of rows under one deliverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverableGroup {
    pub name: String,
    pub fields: Vec<GroupedField>,
}

/// A field inside a [`DeliverableGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedField {
    pub name: String,
    pub content: IndexMap<String, String>,
}

/// One row of the asset requirements tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequirement {
    pub deliverable: String,
    pub asset_name: String,
    /// Pixel width; `None` when the cell was empty.
    pub width: Option<u32>,
    /// Pixel height; `None` when the cell was empty.
    pub height: Option<u32>,
    pub max_file_size: String,
    pub formats: String,
    pub filename_format: String,
    pub notes: String,
}

/// Provenance for a parsed workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub filename: String,
    pub tab_names: Vec<String>,
    pub parsed_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

/// Re-index rows by deliverable without altering them.
pub fn group_rows_by_deliverable(rows: &[ContentRow]) -> IndexMap<String, DeliverableGroup> {
    let mut grouped: IndexMap<String, DeliverableGroup> = IndexMap::new();

    for row in rows {
        grouped
            .entry(row.deliverable.clone())
            .or_insert_with(|| DeliverableGroup {
                name: row.deliverable.clone(),
                fields: Vec::new(),
            })
            .fields
            .push(GroupedField {
                name: row.field.clone(),
                content: row.content.clone(),
            });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let rows = vec![
            ContentRow::new("Hero", "Headline").with_content("en-US", "A"),
            ContentRow::new("Gallery 1", "Headline").with_content("en-US", "B"),
            ContentRow::new("Hero", "Body").with_content("en-US", "C"),
        ];

        let grouped = group_rows_by_deliverable(&rows);
        let names: Vec<_> = grouped.keys().cloned().collect();
        assert_eq!(names, vec!["Hero", "Gallery 1"]);

        let hero = &grouped["Hero"];
        assert_eq!(hero.fields.len(), 2);
        assert_eq!(hero.fields[1].name, "Body");
        assert_eq!(hero.fields[1].content["en-US"], "C");
    }

    #[test]
    fn test_grouping_empty() {
        assert!(group_rows_by_deliverable(&[]).is_empty());
    }
}
