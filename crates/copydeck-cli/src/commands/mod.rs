//! Command implementations.

mod catalog;
mod check;
mod convert;
mod generate;
mod qa;

pub use catalog::CatalogCommand;
pub use check::CheckCommand;
pub use convert::{ExcelToWordCommand, WordToExcelCommand};
pub use generate::GenerateCommand;
pub use qa::{ChatCommand, QaCommand};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use copydeck_common_core::{
    group_rows_by_deliverable, ParsedExcelTemplate, ParsedWordDocument, ProjectData,
    TemplateMetadata,
};
use copydeck_parse::{
    merge_documents, parse_word_batch, BatchOutcome, CsvWorkbookReader, ExcelParser, FileFailure,
    UploadedFile, WordParser, WorkbookReader,
};
use copydeck_transform::LocalizationProject;
use tracing::{debug, warn};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Parse a spreadsheet directory written by `generate` or `word-to-excel`.
pub(crate) fn load_workbook(
    ctx: &CommandContext,
    path: &Path,
) -> Result<ParsedExcelTemplate, CliError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let workbook = CsvWorkbookReader.read_workbook(path)?;
    debug!(filename = %filename, sheets = workbook.sheets.len(), "Workbook loaded");

    let parser = ExcelParser::new(Arc::new(ctx.reference.markets.clone()));
    Ok(parser.parse(&filename, &workbook)?)
}

/// Parse documents as one batch; unreadable files join the failure list.
pub(crate) async fn load_documents(
    ctx: &CommandContext,
    paths: &[PathBuf],
) -> Result<BatchOutcome<ParsedWordDocument>, CliError> {
    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();
    for path in paths {
        match UploadedFile::read(path) {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read input file");
                unreadable.push(FileFailure {
                    filename: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let parser = WordParser::new(ctx.reference.clone());
    let mut outcome = parse_word_batch(&parser, files, &ctx.config.import).await?;
    outcome.failures.extend(unreadable);
    Ok(outcome.require_any()?)
}

/// Load a project for review: one spreadsheet directory, or a set of documents.
///
/// Documents for a single market are merged into one document project.
/// Documents spanning several markets are assembled into rows.
pub(crate) async fn load_project(
    ctx: &CommandContext,
    inputs: &[PathBuf],
) -> Result<ProjectData, CliError> {
    if let [single] = inputs {
        if single.is_dir() {
            return Ok(ProjectData::Excel(load_workbook(ctx, single)?));
        }
    }

    let outcome = load_documents(ctx, inputs).await?;
    for failure in &outcome.failures {
        warn!(filename = %failure.filename, error = %failure.error, "Skipping file");
    }

    let mut documents = outcome.parsed;
    let single_market = documents.windows(2).all(|w| w[0].market == w[1].market);
    if single_market {
        let merged = merge_documents(documents)
            .ok_or_else(|| CliError::validation("No documents to review"))?;
        return Ok(ProjectData::Word(merged));
    }

    let filename = format!("{} documents", documents.len());
    documents.sort_by(|a, b| a.market.cmp(&b.market));
    let project = LocalizationProject::from_documents(documents, Utc::now())?;
    Ok(ProjectData::Excel(ParsedExcelTemplate {
        markets: project.ordered_markets(),
        grouped: group_rows_by_deliverable(&project.rows),
        rows: project.rows,
        requirements: project.requirements,
        project_name: project.project_name,
        metadata: TemplateMetadata {
            filename,
            tab_names: Vec::new(),
            parsed_at: Utc::now(),
            warnings: project.warnings,
        },
    }))
}

/// Failure lines in `filename: error` form.
pub(crate) fn failure_lines(failures: &[FileFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.filename, f.error))
        .collect()
}

/// Lead market for a selection.
///
/// An explicit `--lead` is returned as given so an unselected code fails
/// downstream. The configured default only applies when it is selected.
pub(crate) fn resolve_lead(
    ctx: &CommandContext,
    explicit: Option<&str>,
    markets: &[String],
) -> Option<String> {
    if let Some(code) = explicit {
        return Some(code.to_string());
    }
    let configured = ctx.config.export.lead_market.as_deref()?;
    if markets.iter().any(|m| m == configured) {
        Some(configured.to_string())
    } else {
        warn!(
            lead = configured,
            "Configured lead market is not selected, ignoring it"
        );
        None
    }
}
