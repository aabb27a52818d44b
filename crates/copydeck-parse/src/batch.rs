//! Batch parsing with per-file failure isolation.

use copydeck_common_config::ImportConfig;
use copydeck_common_core::ParsedWordDocument;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FileFailure, ParseError, ParseResult};
use crate::input::UploadedFile;
use crate::word::WordParser;

/// Successes and per-file failures of a batch, in upload order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome<T> {
    pub parsed: Vec<T>,
    pub failures: Vec<FileFailure>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            parsed: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    /// Fail when a non-empty batch produced no successes.
    pub fn require_any(self) -> ParseResult<Self> {
        if self.parsed.is_empty() && !self.failures.is_empty() {
            return Err(ParseError::NoFilesParsed {
                failures: self.failures,
            });
        }
        Ok(self)
    }
}

fn check_size(file: &UploadedFile, limits: &ImportConfig) -> Result<(), String> {
    let max_bytes = limits.max_file_size_mb.saturating_mul(1024 * 1024);
    if file.len() as u64 > max_bytes {
        return Err(format!(
            "File exceeds the {} MB upload limit",
            limits.max_file_size_mb
        ));
    }
    Ok(())
}

/// Parse every document independently on the blocking pool and wait for all.
///
/// Oversized or undecodable files become failures; the batch never aborts
/// early. Exceeding the file-count limit rejects the whole batch.
pub async fn parse_word_batch(
    parser: &WordParser,
    files: Vec<UploadedFile>,
    limits: &ImportConfig,
) -> ParseResult<BatchOutcome<ParsedWordDocument>> {
    if files.len() > limits.max_files {
        return Err(ParseError::TooManyFiles {
            count: files.len(),
            max: limits.max_files,
        });
    }

    let total = files.len();
    let tasks = files.into_iter().map(|file| {
        let parser = parser.clone();
        let size_check = check_size(&file, limits);
        async move {
            let filename = file.name.clone();
            if let Err(error) = size_check {
                return Err(FileFailure { filename, error });
            }
            match tokio::task::spawn_blocking(move || parser.parse(&file)).await {
                Ok(Ok(document)) => Ok(document),
                Ok(Err(e)) => Err(FileFailure {
                    filename,
                    error: e.to_string(),
                }),
                Err(join) => Err(FileFailure {
                    filename,
                    error: format!("parse task failed: {join}"),
                }),
            }
        }
    });

    let mut outcome = BatchOutcome::default();
    for result in join_all(tasks).await {
        match result {
            Ok(document) => outcome.parsed.push(document),
            Err(failure) => {
                warn!(filename = %failure.filename, error = %failure.error, "File failed to parse");
                outcome.failures.push(failure);
            }
        }
    }

    info!(
        total,
        parsed = outcome.parsed.len(),
        failed = outcome.failures.len(),
        "Batch parse complete"
    );
    Ok(outcome)
}
