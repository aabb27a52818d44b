//! CLI error handling.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use copydeck_catalog::CatalogError;
use copydeck_common_config::ConfigError;
use copydeck_parse::{ParseError, ReadError, COPY_TAB};
use copydeck_qa::{LlmError, QaError};
use copydeck_transform::TransformError;
use thiserror::Error;

/// CLI error type with exit-code and hint context.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Network {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        /// One line per offending file or cell.
        details: Vec<String>,
        /// Raw text behind the failure, such as an unparseable model reply.
        raw: Option<String>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
        suggestions: Vec<String>,
    },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Network { .. } => "E003",
            Self::Validation { .. } => "E004",
            Self::NotFound { .. } => "E005",
            Self::User { .. } => "E010",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        let code = match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Network { .. } => 4,
            Self::Validation { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::User { .. } | Self::Other(_) => 1,
        };
        ExitCode::from(code)
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Network { hint, .. } | Self::User { hint, .. } => {
                hint.as_deref()
            }
            Self::NotFound { suggestions, .. } if !suggestions.is_empty() => {
                Some("See suggestions above")
            }
            _ => None,
        }
    }

    /// Extra lines printed under the message.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Validation { details, raw, .. } => {
                let mut lines = details.clone();
                if let Some(raw) = raw {
                    lines.push(format!("raw response: {raw}"));
                }
                lines
            }
            Self::NotFound { suggestions, .. } => suggestions
                .iter()
                .map(|s| format!("did you mean '{s}'?"))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn io_with_path(
        message: impl Into<String>,
        source: io::Error,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: Some(path.into()),
        }
    }

    pub fn not_found_with_suggestions(
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
            suggestions,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
            raw: None,
        }
    }

    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {err}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_hint(
            format!("Configuration error: {err}"),
            "Check .copydeck/config.yaml or the file passed with --config",
        )
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownDeliverable(name) => {
                Self::not_found_with_suggestions("Deliverable", name, Vec::new())
            }
            other => Self::config_with_hint(
                format!("Reference data error: {other}"),
                "Check the catalog override paths in your configuration",
            ),
        }
    }
}

impl From<ReadError> for CliError {
    fn from(err: ReadError) -> Self {
        Self::validation(format!("Could not read input: {err}"))
    }
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        let message = err.to_string();
        match err {
            ParseError::NoFilesParsed { failures } => Self::Validation {
                message,
                details: failures
                    .into_iter()
                    .map(|f| format!("{}: {}", f.filename, f.error))
                    .collect(),
                raw: None,
            },
            err if err.is_structural() => Self::Validation {
                message,
                details: vec![format!(
                    "Expected a \"{COPY_TAB}\" sheet whose header row reads \
                     Deliverable, Name, then one market code per column"
                )],
                raw: None,
            },
            _ => Self::validation(message),
        }
    }
}

impl From<TransformError> for CliError {
    fn from(err: TransformError) -> Self {
        let message = err.to_string();
        match err {
            TransformError::Write { path, source } => {
                Self::io_with_path(format!("Failed to write {}", path.display()), source, path)
            }
            TransformError::Catalog(inner) => inner.into(),
            TransformError::LeadNotSelected(_) => {
                Self::user_with_hint(
                    message,
                    "Choose a --lead among the selected markets: a generate --market code, \
                     or a market present in the input files",
                )
            }
            _ => Self::User {
                message,
                hint: None,
            },
        }
    }
}

impl From<QaError> for CliError {
    fn from(err: QaError) -> Self {
        let message = err.to_string();
        match err {
            QaError::RateLimited { .. } => Self::User {
                message,
                hint: None,
            },
            QaError::MalformedResponse { raw, .. } => Self::Validation {
                message,
                details: Vec::new(),
                raw: Some(raw),
            },
            QaError::Provider(inner) => inner.into(),
            QaError::EmptyMessage => Self::user_with_hint(message, "Pass a question with --message"),
        }
    }
}

impl From<LlmError> for CliError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey(var) => Self::config_with_hint(
                format!("{var} not configured"),
                format!("Set {var} in the environment or in .env"),
            ),
            other => Self::Network {
                message: format!("QA check failed: {other}"),
                hint: None,
            },
        }
    }
}
