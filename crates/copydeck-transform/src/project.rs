//! Localization projects: the wide row set plus what is needed to emit it.

use chrono::{DateTime, Utc};
use copydeck_catalog::{Catalog, MarketRegistry};
use copydeck_common_config::ExportConfig;
use copydeck_common_core::{
    AssetRequirement, Block, ContentRow, ParsedExcelTemplate, ParsedWordDocument, Workbook,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::emit::{
    copy_sheet, requirements_from_catalog, requirements_sheet, word_blocks, WordFraming,
};
use crate::error::{TransformError, TransformResult};
use crate::markets::{order_markets, MarketSelection};
use crate::tall::project_market;
use crate::wide::{assemble_from_documents, rows_from_catalog};

/// Folder that holds the per-market documents of an export.
pub const WORD_DOCUMENTS_DIR: &str = "Word_Documents";

/// File stem of a project's spreadsheet.
pub fn workbook_stem(project_name: &str) -> String {
    format!("{project_name}_Localization_Template")
}

/// File stem of a market's document.
pub fn document_stem(market: &str) -> String {
    format!("Marketing_Copy_{market}")
}

/// Project name for a spreadsheet built from imported documents.
pub fn import_project_name(market: &str, at: DateTime<Utc>) -> String {
    format!("Import_{market}_{}", at.timestamp_millis())
}

/// A market's emitted document.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketDocument {
    pub market: String,
    pub stem: String,
    pub blocks: Vec<Block>,
}

/// Rows, markets and requirements ready for emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationProject {
    pub project_name: String,
    /// Markets as selected or discovered.
    pub markets: Vec<String>,
    pub lead: Option<String>,
    pub rows: Vec<ContentRow>,
    pub requirements: Vec<AssetRequirement>,
    /// Non-fatal issues carried over from parsing.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl LocalizationProject {
    /// New project from catalog deliverables; every cell starts missing.
    pub fn generate<S: AsRef<str>>(
        project_name: impl Into<String>,
        catalog: &Catalog,
        deliverables: &[S],
        selection: &MarketSelection,
    ) -> TransformResult<Self> {
        if deliverables.is_empty() {
            return Err(TransformError::EmptyDeliverableSelection);
        }
        let selected = catalog.select(deliverables)?;
        let project = Self {
            project_name: project_name.into(),
            markets: selection.markets().to_vec(),
            lead: selection.lead().map(str::to_string),
            rows: rows_from_catalog(&selected),
            requirements: requirements_from_catalog(&selected),
            warnings: Vec::new(),
        };
        info!(
            project = %project.project_name,
            deliverables = selected.len(),
            rows = project.rows.len(),
            markets = project.markets.len(),
            "Generated localization template"
        );
        Ok(project)
    }

    /// Project from a parsed spreadsheet.
    pub fn from_template(template: ParsedExcelTemplate) -> Self {
        Self {
            project_name: template.project_name,
            markets: template.markets,
            lead: None,
            rows: template.rows,
            requirements: template.requirements,
            warnings: template.metadata.warnings,
        }
    }

    /// Project from parsed per-market documents.
    ///
    /// The project is named after the first document's market and the time
    /// of import.
    pub fn from_documents(
        documents: Vec<ParsedWordDocument>,
        at: DateTime<Utc>,
    ) -> TransformResult<Self> {
        let first_market = documents
            .first()
            .map(|d| d.market.clone())
            .ok_or(TransformError::NoDocuments)?;
        let assembly = assemble_from_documents(documents);
        Ok(Self {
            project_name: import_project_name(&first_market, at),
            markets: assembly.markets,
            lead: None,
            rows: assembly.rows,
            requirements: Vec::new(),
            warnings: assembly.warnings,
        })
    }

    /// Set the lead market if it is part of the project.
    pub fn with_lead(mut self, lead: Option<String>) -> TransformResult<Self> {
        if let Some(code) = &lead {
            if !self.markets.contains(code) {
                return Err(TransformError::LeadNotSelected(code.clone()));
            }
        }
        self.lead = lead;
        Ok(self)
    }

    /// Market columns in emission order.
    pub fn ordered_markets(&self) -> Vec<String> {
        order_markets(&self.markets, self.lead.as_deref())
    }

    /// Spreadsheet with copy and requirements sheets.
    pub fn workbook(&self, export: &ExportConfig) -> Workbook {
        Workbook {
            sheets: vec![
                copy_sheet(&self.rows, &self.ordered_markets(), export.placeholder_policy),
                requirements_sheet(&self.requirements),
            ],
        }
    }

    /// One document per market, lead first.
    pub fn documents(
        &self,
        catalog: &Catalog,
        registry: &MarketRegistry,
        export: &ExportConfig,
    ) -> Vec<MarketDocument> {
        self.ordered_markets()
            .into_iter()
            .map(|code| {
                let framing = WordFraming {
                    title: self.project_name.clone(),
                    market: registry.resolve(&code),
                    template_version: export.template_version.clone(),
                };
                let tall = project_market(&self.rows, &code);
                MarketDocument {
                    stem: document_stem(&code),
                    blocks: word_blocks(&tall, &framing, catalog, export.placeholder_policy),
                    market: code,
                }
            })
            .collect()
    }
}
