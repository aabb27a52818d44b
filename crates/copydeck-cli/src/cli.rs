//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use copydeck_catalog::ReferenceData;
use copydeck_common_config::{ConfigLoader, CopydeckConfig};
use tracing::debug;

use crate::commands::{
    CatalogCommand, ChatCommand, CheckCommand, ExcelToWordCommand, GenerateCommand, QaCommand,
    WordToExcelCommand,
};
use crate::error::CliError;

/// Copydeck - marketing copy localization templates
///
/// Generate multi-market copy templates, convert between the spreadsheet
/// and per-market document shapes, and review copy with a language model.
#[derive(Debug, Parser)]
#[command(
    name = "copydeck",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "COPYDECK_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a blank localization template and per-market documents
    #[command(visible_alias = "new")]
    Generate(GenerateCommand),

    /// Combine per-market documents into one spreadsheet
    WordToExcel(WordToExcelCommand),

    /// Split a spreadsheet into one document per market
    ExcelToWord(ExcelToWordCommand),

    /// Report placeholder and empty cells in a spreadsheet
    Check(CheckCommand),

    /// Run a language-model review over a project
    Qa(QaCommand),

    /// Ask the QA assistant a question about a project
    Chat(ChatCommand),

    /// List deliverables or markets
    #[command(visible_alias = "ls")]
    Catalog(CatalogCommand),
}

impl Cli {
    /// Load configuration from the given file or from `.copydeck/config.yaml`
    pub fn load_config(&self) -> Result<CopydeckConfig, CliError> {
        let config = match &self.config {
            Some(path) => ConfigLoader::from_file(path).load_required()?,
            None => ConfigLoader::new(".").load()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self, config: CopydeckConfig) -> Result<(), CliError> {
        let reference = ReferenceData::load(&config.catalog)?;
        debug!(
            deliverables = reference.catalog.deliverables().len(),
            markets = reference.markets.markets().len(),
            "Reference data ready"
        );

        let ctx = CommandContext {
            config,
            reference: Arc::new(reference),
            format: self.format,
        };

        match self.command {
            Command::Generate(cmd) => cmd.execute(&ctx).await,
            Command::WordToExcel(cmd) => cmd.execute(&ctx).await,
            Command::ExcelToWord(cmd) => cmd.execute(&ctx).await,
            Command::Check(cmd) => cmd.execute(&ctx).await,
            Command::Qa(cmd) => cmd.execute(&ctx).await,
            Command::Chat(cmd) => cmd.execute(&ctx).await,
            Command::Catalog(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: CopydeckConfig,
    pub reference: Arc<ReferenceData>,
    pub format: OutputFormat,
}
