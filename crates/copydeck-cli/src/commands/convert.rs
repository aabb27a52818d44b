//! Conversions between the spreadsheet and per-market documents.

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use copydeck_transform::{
    project::workbook_stem, write_document, write_workbook, LocalizationProject,
    WORD_DOCUMENTS_DIR,
};
use serde::Serialize;
use tracing::info;

use crate::cli::CommandContext;
use crate::commands::{failure_lines, load_documents, load_workbook, resolve_lead};
use crate::error::CliError;
use crate::output::{print_output, push_list, FormattedOutput};

/// Combine per-market documents into one spreadsheet
#[derive(Debug, Parser)]
pub struct WordToExcelCommand {
    /// Document files, one market each (`..._xx-XX.md`)
    #[arg(required = true, num_args = 1..)]
    pub documents: Vec<PathBuf>,

    /// Market placed first in the spreadsheet
    #[arg(long)]
    pub lead: Option<String>,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Split a spreadsheet into one document per market
#[derive(Debug, Parser)]
pub struct ExcelToWordCommand {
    /// Spreadsheet directory (`<Name>_Localization_Template`)
    pub workbook: PathBuf,

    /// Market placed first
    #[arg(long)]
    pub lead: Option<String>,

    /// Directory to write into; documents go under `Word_Documents/`
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
struct ConversionOutput {
    project: String,
    markets: Vec<String>,
    rows: usize,
    written: Vec<PathBuf>,
    warnings: Vec<String>,
    failures: Vec<String>,
}

impl FormattedOutput for ConversionOutput {
    fn format_text(&self) -> String {
        let mut out = format!(
            "✓ {}: {} rows, markets {}\n",
            self.project,
            self.rows,
            self.markets.join(", ")
        );
        for path in &self.written {
            out.push_str(&format!("  wrote {}\n", path.display()));
        }
        push_list(&mut out, "Warnings", &self.warnings);
        push_list(&mut out, "Failed files", &self.failures);
        out.trim_end().to_string()
    }
}

impl WordToExcelCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let outcome = load_documents(ctx, &self.documents).await?;
        let failures = failure_lines(&outcome.failures);

        let project = LocalizationProject::from_documents(outcome.parsed, Utc::now())?;
        let lead = resolve_lead(ctx, self.lead.as_deref(), &project.markets);
        let project = project.with_lead(lead)?;

        let path = write_workbook(
            &self.output,
            &workbook_stem(&project.project_name),
            &project.workbook(&ctx.config.export),
        )?;
        info!(project = %project.project_name, path = %path.display(), "Spreadsheet written");

        let output = ConversionOutput {
            markets: project.ordered_markets(),
            project: project.project_name,
            rows: project.rows.len(),
            written: vec![path],
            warnings: project.warnings,
            failures,
        };
        print_output(ctx, &output)
    }
}

impl ExcelToWordCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let template = load_workbook(ctx, &self.workbook)?;
        let project = LocalizationProject::from_template(template);
        let lead = resolve_lead(ctx, self.lead.as_deref(), &project.markets);
        let project = project.with_lead(lead)?;

        let reference = &ctx.reference;
        let docs_dir = self.output.join(WORD_DOCUMENTS_DIR);
        let written = project
            .documents(&reference.catalog, &reference.markets, &ctx.config.export)
            .iter()
            .map(|doc| write_document(&docs_dir, &doc.stem, &doc.blocks))
            .collect::<Result<Vec<_>, _>>()?;
        info!(project = %project.project_name, documents = written.len(), "Documents written");

        let output = ConversionOutput {
            markets: project.ordered_markets(),
            project: project.project_name,
            rows: project.rows.len(),
            written,
            warnings: project.warnings,
            failures: Vec::new(),
        };
        print_output(ctx, &output)
    }
}
