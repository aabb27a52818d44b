//! QA review and chat commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use copydeck_qa::{AnthropicProvider, ChatTurn, QaReport, QaService, Severity};
use futures::StreamExt;
use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::commands::load_project;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Run a language-model review over a project
#[derive(Debug, Parser)]
pub struct QaCommand {
    /// A spreadsheet directory, or one or more document files
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Caller identity used for rate limiting
    #[arg(long, default_value = "anonymous")]
    pub caller: String,
}

/// Ask the QA assistant a question about a project
#[derive(Debug, Parser)]
pub struct ChatCommand {
    /// A spreadsheet directory, or one or more document files
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Question to ask
    #[arg(short, long)]
    pub message: String,

    /// JSON file with earlier turns: `[{"role": "user", "content": "..."}]`
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Caller identity used for rate limiting
    #[arg(long, default_value = "anonymous")]
    pub caller: String,
}

fn service(ctx: &CommandContext) -> Result<QaService, CliError> {
    let provider = AnthropicProvider::from_config(&ctx.config.qa)?;
    Ok(QaService::new(Arc::new(provider), ctx.config.qa.clone()))
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ReportOutput(QaReport);

impl FormattedOutput for ReportOutput {
    fn format_text(&self) -> String {
        let report = &self.0;
        let summary = report.tally();
        if summary.total_issues == 0 {
            return "✓ No issues found".to_string();
        }

        let mut out = format!(
            "{} issues: {} errors, {} warnings, {} suggestions\n",
            summary.total_issues, summary.errors, summary.warnings, summary.suggestions
        );
        for (severity, label) in [
            (Severity::Error, "Errors"),
            (Severity::Warning, "Warnings"),
            (Severity::Suggestion, "Suggestions"),
        ] {
            let issues: Vec<_> = report.by_severity(severity).collect();
            if issues.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{label}:\n"));
            for issue in issues {
                out.push_str(&format!(
                    "  [{}] {} / {}: {}\n",
                    issue.market, issue.deliverable, issue.field, issue.message
                ));
                if let Some(suggestion) = &issue.suggestion {
                    out.push_str(&format!("      suggestion: {suggestion}\n"));
                }
            }
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Serialize)]
struct ChatOutput {
    reply: String,
}

impl FormattedOutput for ChatOutput {
    fn format_text(&self) -> String {
        self.reply.clone()
    }
}

impl QaCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let project = load_project(ctx, &self.inputs).await?;
        let report = service(ctx)?.run_batch(&self.caller, &project).await?;
        print_output(ctx, &ReportOutput(report))
    }
}

impl ChatCommand {
    fn load_history(&self) -> Result<Vec<ChatTurn>, CliError> {
        match &self.history {
            Some(path) => {
                let data = std::fs::read_to_string(path).map_err(|e| {
                    CliError::io_with_path(format!("Failed to read {}", path.display()), e, path)
                })?;
                Ok(serde_json::from_str(&data)?)
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let history = self.load_history()?;
        let project = load_project(ctx, &self.inputs).await?;
        let service = service(ctx)?;

        if ctx.format == OutputFormat::Json {
            let reply = service
                .chat_to_string(&self.caller, &project, &history, &self.message)
                .await?;
            return print_output(ctx, &ChatOutput { reply });
        }

        let mut replies = service
            .chat(&self.caller, &project, &history, &self.message)
            .await?;
        let mut stdout = std::io::stdout();
        while let Some(fragment) = replies.next().await {
            stdout.write_all(fragment?.as_bytes())?;
            stdout.flush()?;
        }
        writeln!(stdout)?;
        Ok(())
    }
}
