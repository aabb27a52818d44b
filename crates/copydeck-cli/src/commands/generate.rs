//! Generate command implementation.

use std::path::PathBuf;

use clap::Parser;
use copydeck_catalog::CatalogError;
use copydeck_transform::{
    project::workbook_stem, write_document, write_workbook, LocalizationProject,
    MarketSelection, WORD_DOCUMENTS_DIR,
};
use serde::Serialize;
use tracing::info;

use crate::cli::CommandContext;
use crate::commands::resolve_lead;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Generate a blank localization template and per-market documents
#[derive(Debug, Parser)]
pub struct GenerateCommand {
    /// Project name used in file names and document titles
    #[arg(short, long, default_value = "Project")]
    pub name: String,

    /// Deliverable to include (repeatable)
    #[arg(short, long = "deliverable", required = true)]
    pub deliverables: Vec<String>,

    /// Market code to include (repeatable)
    #[arg(short, long = "market", required = true)]
    pub markets: Vec<String>,

    /// Market placed first in the spreadsheet
    #[arg(long)]
    pub lead: Option<String>,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    project: String,
    markets: Vec<String>,
    rows: usize,
    workbook: PathBuf,
    documents: Vec<PathBuf>,
    unknown_markets: Vec<String>,
}

impl FormattedOutput for GenerateOutput {
    fn format_text(&self) -> String {
        let mut out = format!(
            "✓ Generated {} ({} rows x {} markets)\n  workbook: {}\n",
            self.project,
            self.rows,
            self.markets.len(),
            self.workbook.display()
        );
        for doc in &self.documents {
            out.push_str(&format!("  document: {}\n", doc.display()));
        }
        if !self.unknown_markets.is_empty() {
            out.push_str(&format!(
                "  note: not in the market registry: {}\n",
                self.unknown_markets.join(", ")
            ));
        }
        out.trim_end().to_string()
    }
}

impl GenerateCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let reference = &ctx.reference;
        let lead = resolve_lead(ctx, self.lead.as_deref(), &self.markets);
        let selection = MarketSelection::new(self.markets.clone(), lead)?;

        let project = LocalizationProject::generate(
            &self.name,
            &reference.catalog,
            &self.deliverables,
            &selection,
        )
        .map_err(|e| match e {
            copydeck_transform::TransformError::Catalog(CatalogError::UnknownDeliverable(name)) => {
                CliError::not_found_with_suggestions(
                    "Deliverable",
                    name,
                    reference.catalog.names().map(str::to_string).collect(),
                )
            }
            other => other.into(),
        })?;

        let workbook = write_workbook(
            &self.output,
            &workbook_stem(&project.project_name),
            &project.workbook(&ctx.config.export),
        )?;

        let docs_dir = self.output.join(WORD_DOCUMENTS_DIR);
        let documents = project
            .documents(&reference.catalog, &reference.markets, &ctx.config.export)
            .iter()
            .map(|doc| write_document(&docs_dir, &doc.stem, &doc.blocks))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            project = %project.project_name,
            documents = documents.len(),
            "Template written"
        );

        let output = GenerateOutput {
            unknown_markets: project
                .markets
                .iter()
                .filter(|m| !reference.markets.contains(m))
                .cloned()
                .collect(),
            markets: project.ordered_markets(),
            project: project.project_name,
            rows: project.rows.len(),
            workbook,
            documents,
        };
        print_output(ctx, &output)
    }
}
