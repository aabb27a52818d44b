//! Completeness check command.

use std::path::PathBuf;

use clap::Parser;
use copydeck_transform::{order_markets, validate_completeness, CompletenessIssue};
use serde::Serialize;

use crate::cli::CommandContext;
use crate::commands::load_workbook;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Report placeholder and empty cells in a spreadsheet
#[derive(Debug, Parser)]
pub struct CheckCommand {
    /// Spreadsheet directory
    pub workbook: PathBuf,

    /// Only check these markets (repeatable)
    #[arg(short, long = "market")]
    pub markets: Vec<String>,

    /// Exit with an error when anything is incomplete
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    complete: bool,
    markets: Vec<String>,
    issues: Vec<CompletenessIssue>,
}

impl FormattedOutput for CheckOutput {
    fn format_text(&self) -> String {
        if self.complete {
            return format!("✓ All cells complete for {}", self.markets.join(", "));
        }
        let mut out = format!("✗ {} incomplete cells\n", self.issues.len());
        for issue in &self.issues {
            out.push_str(&format!(
                "  row {:>3}  {} / {} [{}]: {}\n",
                issue.row, issue.deliverable, issue.field, issue.market, issue.issue
            ));
        }
        out.trim_end().to_string()
    }
}

impl CheckCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let template = load_workbook(ctx, &self.workbook)?;
        let markets = if self.markets.is_empty() {
            order_markets(&template.markets, ctx.config.export.lead_market.as_deref())
        } else {
            self.markets.clone()
        };

        let issues = validate_completeness(&template.rows, &markets);
        let output = CheckOutput {
            complete: issues.is_empty(),
            markets,
            issues,
        };
        print_output(ctx, &output)?;

        if self.strict && !output.complete {
            return Err(CliError::validation(format!(
                "{} cells need translation",
                output.issues.len()
            )));
        }
        Ok(())
    }
}
