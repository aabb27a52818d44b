//! Excel template parser: copy tab to wide content rows.

use std::sync::{Arc, OnceLock};

use copydeck_catalog::MarketRegistry;
use copydeck_common_core::{
    group_rows_by_deliverable, AssetRequirement, Cell, ContentRow, ParsedExcelTemplate,
    TemplateMetadata, Workbook, Worksheet,
};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{ParseError, ParseResult};

/// Name of the sheet holding the copy matrix.
pub const COPY_TAB: &str = "Copy Template";
/// Name of the optional sheet holding asset requirements.
pub const REQUIREMENTS_TAB: &str = "Asset Requirements";
/// Project name used when the filename yields none.
pub const DEFAULT_PROJECT_NAME: &str = "Imported_Project";

fn project_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)_Localization_Template").expect("valid pattern"))
}

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(.+?)\.xlsx$").expect("valid pattern"))
}

/// Project name from a `Name_Localization_Template...` filename.
pub fn project_name_from_filename(filename: &str) -> String {
    if let Some(caps) = project_pattern().captures(filename) {
        return caps[1].to_string();
    }
    if let Some(caps) = extension_pattern().captures(filename) {
        return caps[1].to_string();
    }
    DEFAULT_PROJECT_NAME.to_string()
}

fn non_blank_rows(sheet: &Worksheet) -> Vec<&Vec<Cell>> {
    sheet
        .rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.is_blank()))
        .collect()
}

fn cell_at(row: &[Cell], idx: usize) -> Option<&Cell> {
    row.get(idx).filter(|c| !c.is_blank())
}

fn text_at(row: &[Cell], idx: usize) -> String {
    row.get(idx).map(Cell::as_text).unwrap_or_default()
}

/// Cell content for a market column, untrimmed text when the cell holds text.
fn content_at(row: &[Cell], idx: usize) -> String {
    match row.get(idx) {
        Some(Cell::Text(s)) => s.clone(),
        Some(other) => other.as_text(),
        None => String::new(),
    }
}

/// Copy tab contents: header market codes and rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyTab {
    pub markets: Vec<String>,
    pub rows: Vec<ContentRow>,
    pub warnings: Vec<String>,
}

/// Parse the copy tab of a template.
pub fn parse_copy_tab(sheet: &Worksheet) -> ParseResult<CopyTab> {
    let rows = non_blank_rows(sheet);
    let Some(header) = rows.first() else {
        return Err(ParseError::EmptySheet(sheet.name.clone()));
    };

    if cell_at(header, 0).is_none() || cell_at(header, 1).is_none() {
        return Err(ParseError::InvalidStructure(
            "First two columns must be Deliverable and Name".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    let mut columns: Vec<(String, usize)> = Vec::new();
    for (idx, cell) in header.iter().enumerate().skip(2) {
        let code = cell.as_text();
        if code.is_empty() {
            continue;
        }
        if columns.iter().any(|(existing, _)| *existing == code) {
            warnings.push(format!("Duplicate market column: \"{code}\" - later column ignored"));
            continue;
        }
        columns.push((code, idx));
    }

    if columns.is_empty() {
        return Err(ParseError::NoMarketColumns);
    }

    let mut content_rows = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(1) {
        let deliverable = text_at(row, 0);
        let field = text_at(row, 1);

        if deliverable.is_empty() && field.is_empty() {
            continue;
        }
        if deliverable.is_empty() || field.is_empty() {
            warn!(
                row = i + 1,
                "Row {} has missing deliverable or field name, skipping",
                i + 1
            );
            continue;
        }

        let mut content_row = ContentRow::new(deliverable, field);
        for (code, idx) in &columns {
            content_row.set(code.clone(), content_at(row, *idx));
        }
        content_rows.push(content_row);
    }

    Ok(CopyTab {
        markets: columns.into_iter().map(|(code, _)| code).collect(),
        rows: content_rows,
        warnings,
    })
}

/// Parse the asset requirements tab; the first row is a header.
pub fn parse_requirements_tab(sheet: &Worksheet) -> Vec<AssetRequirement> {
    non_blank_rows(sheet)
        .into_iter()
        .skip(1)
        .filter(|row| cell_at(row, 0).is_some())
        .map(|row| AssetRequirement {
            deliverable: text_at(row, 0),
            asset_name: text_at(row, 1),
            width: row.get(2).and_then(Cell::as_u32).filter(|w| *w > 0),
            height: row.get(3).and_then(Cell::as_u32).filter(|h| *h > 0),
            max_file_size: text_at(row, 4),
            formats: text_at(row, 5),
            filename_format: text_at(row, 6),
            notes: text_at(row, 7),
        })
        .collect()
}

/// Warnings for header codes missing from the registry.
pub fn unknown_market_warnings(markets: &[String], registry: &MarketRegistry) -> Vec<String> {
    markets
        .iter()
        .filter(|code| !registry.contains(code))
        .map(|code| format!("Unknown market code: \"{code}\" - may not be in standard list"))
        .collect()
}

/// Parses decoded workbooks into [`ParsedExcelTemplate`]s.
#[derive(Debug, Clone)]
pub struct ExcelParser {
    markets: Arc<MarketRegistry>,
}

impl ExcelParser {
    pub fn new(markets: Arc<MarketRegistry>) -> Self {
        Self { markets }
    }

    /// Parse a workbook uploaded under `filename`.
    pub fn parse(&self, filename: &str, workbook: &Workbook) -> ParseResult<ParsedExcelTemplate> {
        let mut warnings = Vec::new();

        let copy_sheet = match workbook.sheet(COPY_TAB) {
            Some(sheet) => sheet,
            None => {
                let first = workbook.sheets.first().ok_or(ParseError::NoSheets)?;
                warnings.push(format!(
                    "{COPY_TAB} tab not found by name, using first sheet"
                ));
                first
            }
        };

        let copy = parse_copy_tab(copy_sheet)?;
        warnings.extend(copy.warnings);
        warnings.extend(unknown_market_warnings(&copy.markets, &self.markets));

        let requirements = match workbook.sheet(REQUIREMENTS_TAB) {
            Some(sheet) => parse_requirements_tab(sheet),
            None => {
                warnings.push(format!("{REQUIREMENTS_TAB} tab not found (optional)"));
                Vec::new()
            }
        };

        let grouped = group_rows_by_deliverable(&copy.rows);
        let project_name = project_name_from_filename(filename);
        debug!(
            project = %project_name,
            deliverables = grouped.len(),
            "Grouped template rows"
        );

        let template = ParsedExcelTemplate {
            markets: copy.markets,
            rows: copy.rows,
            grouped,
            requirements,
            project_name,
            metadata: TemplateMetadata {
                filename: filename.to_string(),
                tab_names: workbook.sheet_names(),
                parsed_at: Utc::now(),
                warnings,
            },
        };

        info!(
            filename,
            markets = template.markets.len(),
            rows = template.rows.len(),
            requirements = template.requirements.len(),
            warnings = template.metadata.warnings.len(),
            "Parsed Excel template"
        );
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sheet(name: &str, rows: &[&[&str]]) -> Worksheet {
        let mut sheet = Worksheet::new(name);
        for row in rows {
            sheet.push_row(row.iter().copied());
        }
        sheet
    }

    fn parser() -> ExcelParser {
        ExcelParser::new(Arc::new(MarketRegistry::builtin().unwrap()))
    }

    #[test_case("Spring_Localization_Template_2024-05-01.xlsx", "Spring" ; "template name")]
    #[test_case("Spring Launch.XLSX", "Spring Launch" ; "plain workbook")]
    #[test_case("export", "Imported_Project" ; "fallback")]
    fn test_project_name(filename: &str, expected: &str) {
        assert_eq!(project_name_from_filename(filename), expected);
    }

    #[test]
    fn test_unknown_market_warning() {
        let book = Workbook {
            sheets: vec![sheet(
                COPY_TAB,
                &[
                    &["Deliverable", "Name", "en-US", "xx-YY"],
                    &["Hero", "Headline", "Buy now", "Comprar ahora"],
                ],
            )],
        };
        let template = parser().parse("t.xlsx", &book).unwrap();
        assert_eq!(template.rows.len(), 1);
        assert_eq!(template.rows[0].content_for("xx-YY"), "Comprar ahora");
        assert!(template
            .metadata
            .warnings
            .contains(&"Unknown market code: \"xx-YY\" - may not be in standard list".to_string()));
        assert!(template
            .metadata
            .warnings
            .contains(&"Asset Requirements tab not found (optional)".to_string()));
    }

    #[test]
    fn test_empty_key_header_is_structural_error() {
        let tab = sheet(COPY_TAB, &[&["", "", "en-US"], &["Hero", "Headline", "x"]]);
        let err = parse_copy_tab(&tab).unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure(_)));
        assert!(err.is_structural());
    }

    #[test]
    fn test_no_market_columns() {
        let tab = sheet(COPY_TAB, &[&["Deliverable", "Name", ""]]);
        assert!(matches!(parse_copy_tab(&tab), Err(ParseError::NoMarketColumns)));
    }

    #[test]
    fn test_blank_sheet_is_empty() {
        let tab = sheet(COPY_TAB, &[&["", ""], &[]]);
        assert!(matches!(parse_copy_tab(&tab), Err(ParseError::EmptySheet(_))));
    }

    #[test]
    fn test_no_sheets() {
        assert!(matches!(
            parser().parse("t.xlsx", &Workbook::default()),
            Err(ParseError::NoSheets)
        ));
    }

    #[test]
    fn test_row_rules() {
        let tab = sheet(
            COPY_TAB,
            &[
                &["Deliverable", "Name", "en-US", "", "fr-FR"],
                &["", "", "stray"],
                &["Hero", "", "half key"],
                &[" Hero ", " Body ", "Text", "ignored", "Texte"],
                &["Hero", "CTA"],
            ],
        );
        let copy = parse_copy_tab(&tab).unwrap();
        assert_eq!(copy.markets, vec!["en-US", "fr-FR"]);
        assert_eq!(copy.rows.len(), 2);
        assert_eq!(copy.rows[0].key(), ("Hero", "Body"));
        assert_eq!(copy.rows[0].content_for("fr-FR"), "Texte");
        assert_eq!(copy.rows[1].content.get("en-US"), Some(&String::new()));
        assert_eq!(copy.rows[1].content.get("fr-FR"), Some(&String::new()));
    }

    #[test]
    fn test_first_sheet_fallback_and_requirements() {
        let book = Workbook {
            sheets: vec![
                sheet("Sheet1", &[&["Deliverable", "Name", "en-US"], &["Hero", "Headline", "Hi"]]),
                sheet(
                    REQUIREMENTS_TAB,
                    &[
                        &["Deliverable", "Asset Name", "Width (px)", "Height (px)"],
                        &["", "orphan"],
                        &["Product Detail Page", "Hero Image", "1920", "", "5 MB", "JPG, PNG"],
                    ],
                ),
            ],
        };
        let template = parser().parse("Launch_Localization_Template.xlsx", &book).unwrap();
        assert_eq!(template.project_name, "Launch");
        assert_eq!(
            template.metadata.warnings[0],
            "Copy Template tab not found by name, using first sheet"
        );
        assert_eq!(template.metadata.tab_names, vec!["Sheet1", REQUIREMENTS_TAB]);
        assert_eq!(template.requirements.len(), 1);
        let req = &template.requirements[0];
        assert_eq!(req.width, Some(1920));
        assert_eq!(req.height, None);
        assert_eq!(req.max_file_size, "5 MB");
        assert_eq!(req.notes, "");
        assert_eq!(template.grouped["Hero"].fields[0].name, "Headline");
    }
}
