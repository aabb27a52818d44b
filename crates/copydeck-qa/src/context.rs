//! Serializing project copy into the text block sent to the model.

use std::fmt::Write;

use copydeck_common_core::ProjectData;

/// Context block: the market list followed by one block per field.
///
/// Spreadsheet projects list `[deliverable - field]` with one line per
/// non-empty market value. Document projects list `[section]` with one line
/// per field.
pub fn project_context(project: &ProjectData) -> String {
    let markets = project.markets();
    let markets = if markets.is_empty() {
        "unknown".to_string()
    } else {
        markets.join(", ")
    };

    let mut out = format!("Markets: {markets}\n\nCopy Data:\n");
    match project {
        ProjectData::Excel(template) => {
            for row in &template.rows {
                let _ = write!(out, "\n[{} - {}]\n", row.deliverable, row.field);
                for (market, content) in &row.content {
                    if !content.is_empty() {
                        let _ = writeln!(out, "  {market}: {content}");
                    }
                }
            }
        }
        ProjectData::Word(document) => {
            for section in &document.sections {
                let _ = write!(out, "\n[{}]\n", section.name);
                for field in &section.fields {
                    let _ = writeln!(out, "  {}: {}", field.name, field.content);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use copydeck_common_core::{
        group_rows_by_deliverable, DocumentMetadata, ParsedExcelTemplate, ParsedField,
        ParsedSection, ParsedWordDocument, TemplateMetadata,
    };
    use copydeck_test_utils::sample_rows;

    fn excel_project() -> ProjectData {
        let rows = sample_rows();
        ProjectData::Excel(ParsedExcelTemplate {
            markets: vec!["en-US".into(), "es-MX".into()],
            grouped: group_rows_by_deliverable(&rows),
            rows,
            requirements: Vec::new(),
            project_name: "Spring".into(),
            metadata: TemplateMetadata {
                filename: "Spring_Localization_Template.xlsx".into(),
                tab_names: vec!["Copy Template".into()],
                parsed_at: chrono::Utc::now(),
                warnings: Vec::new(),
            },
        })
    }

    #[test]
    fn test_excel_context_snapshot() {
        insta::assert_snapshot!(project_context(&excel_project()), @r"
        Markets: en-US, es-MX

        Copy Data:

        [Hero - Headline]
          en-US: Buy now
          es-MX: Compra ahora

        [Hero - Body]
          en-US: Fast and light

        [Hero - CTA]
          en-US: Shop
        ");
    }

    #[test]
    fn test_word_context() {
        let project = ProjectData::Word(ParsedWordDocument {
            market: "de-DE".into(),
            sections: vec![ParsedSection {
                name: "Hero".into(),
                fields: vec![ParsedField::verbatim("Headline", "Jetzt kaufen")],
            }],
            metadata: DocumentMetadata::now("copy_de-DE.docx"),
        });
        assert_eq!(
            project_context(&project),
            "Markets: de-DE\n\nCopy Data:\n\n[Hero]\n  Headline: Jetzt kaufen\n"
        );
    }
}
