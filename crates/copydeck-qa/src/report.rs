//! Batch review report schema and validation.

use serde::{Deserialize, Serialize};

use crate::error::{QaError, QaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

/// A single issue raised by the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaIssue {
    pub severity: Severity,
    pub deliverable: String,
    pub field: String,
    pub market: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaSummary {
    pub total_issues: usize,
    pub errors: usize,
    pub warnings: usize,
    pub suggestions: usize,
}

/// Structured result of a batch review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaReport {
    pub issues: Vec<QaIssue>,
    pub summary: QaSummary,
}

impl QaReport {
    /// Summary recomputed from the issue list.
    pub fn tally(&self) -> QaSummary {
        let count = |s: Severity| self.issues.iter().filter(|i| i.severity == s).count();
        QaSummary {
            total_issues: self.issues.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            suggestions: count(Severity::Suggestion),
        }
    }

    /// Issues of one severity.
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &QaIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// Parse a model response as a report; anything else is fatal and keeps the raw text.
pub fn parse_report(raw: &str) -> QaResult<QaReport> {
    serde_json::from_str(raw.trim()).map_err(|e| QaError::MalformedResponse {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}
