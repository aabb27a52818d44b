//! Artifacts written by the transform crate read back through the parsers.

use std::sync::Arc;

use chrono::Utc;
use copydeck_catalog::ReferenceData;
use copydeck_common_config::{ExportConfig, PlaceholderPolicy};
use copydeck_common_core::ContentRow;
use copydeck_parse::{CsvWorkbookReader, ExcelParser, UploadedFile, WordParser, WorkbookReader};
use copydeck_transform::{
    project::workbook_stem, write_document, write_workbook, LocalizationProject, MarketSelection,
    WORD_DOCUMENTS_DIR,
};

fn reference() -> Arc<ReferenceData> {
    Arc::new(ReferenceData::builtin().unwrap())
}

fn filled_project() -> LocalizationProject {
    let rows = vec![
        ContentRow::new("Hero", "Headline")
            .with_content("en-US", "Buy *now* [limited]")
            .with_content("fr-FR", "Achetez maintenant!"),
        ContentRow::new("Hero", "CTA").with_content("en-US", "Shop - today"),
        ContentRow::new("Features", "Feature Title")
            .with_content("en-US", "1. Fast")
            .with_content("fr-FR", "Rapide & léger"),
    ];
    LocalizationProject {
        project_name: "Spring".into(),
        markets: vec!["fr-FR".into(), "en-US".into()],
        lead: Some("en-US".into()),
        rows,
        requirements: Vec::new(),
        warnings: Vec::new(),
    }
}

#[test]
fn test_excel_to_word_to_excel_keeps_filled_cells() {
    let reference = reference();
    let project = filled_project();
    let dir = tempfile::tempdir().unwrap();
    let docs_dir = dir.path().join(WORD_DOCUMENTS_DIR);

    let documents = project.documents(
        &reference.catalog,
        &reference.markets,
        &ExportConfig::default(),
    );
    let parser = WordParser::new(reference.clone());
    let mut parsed = Vec::new();
    for doc in &documents {
        let path = write_document(&docs_dir, &doc.stem, &doc.blocks).unwrap();
        let file = UploadedFile::read(&path).unwrap();
        parsed.push(parser.parse(&file).unwrap());
    }

    assert_eq!(parsed[0].market, "en-US");
    let rebuilt = LocalizationProject::from_documents(parsed, Utc::now()).unwrap();

    for row in &project.rows {
        let back = rebuilt
            .rows
            .iter()
            .find(|r| r.key() == row.key())
            .expect("row survives the round trip");
        for (market, text) in &row.content {
            assert_eq!(back.content_for(market), text);
        }
    }

    // CTA had no fr-FR entry, so its document carried the field placeholder.
    let cta = rebuilt.rows.iter().find(|r| r.key() == ("Hero", "CTA")).unwrap();
    assert_eq!(cta.content_for("fr-FR"), "[CTA translation needed]");
}

#[test]
fn test_generated_workbook_reads_back() {
    let reference = reference();
    let selection = MarketSelection::new(
        vec!["es-MX".into(), "en-US".into(), "fr-FR".into()],
        Some("en-US".into()),
    )
    .unwrap();
    let project = LocalizationProject::generate(
        "Spring",
        &reference.catalog,
        &["Product Detail Page"],
        &selection,
    )
    .unwrap();
    let export = ExportConfig {
        placeholder_policy: PlaceholderPolicy::MissingOnly,
        ..Default::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(
        dir.path(),
        &workbook_stem(&project.project_name),
        &project.workbook(&export),
    )
    .unwrap();
    let workbook = CsvWorkbookReader.read_workbook(&path).unwrap();

    let parser = ExcelParser::new(Arc::new(reference.markets.clone()));
    let template = parser
        .parse("Spring_Localization_Template.xlsx", &workbook)
        .unwrap();

    assert_eq!(template.project_name, "Spring");
    assert_eq!(template.markets, vec!["en-US", "es-MX", "fr-FR"]);
    assert_eq!(template.rows.len(), project.rows.len());
    assert_eq!(template.rows[0].content_for("es-MX"), "[es-MX translation needed]");
    assert_eq!(template.requirements.len(), 2);
    assert_eq!(template.requirements[0].width, Some(1920));
    assert!(template.metadata.warnings.is_empty());
}
