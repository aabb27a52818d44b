//! Completeness check over a wide row set.

use std::fmt;

use copydeck_common_core::ContentRow;
use serde::{Deserialize, Serialize};

use crate::emit::is_placeholder;

/// Why a cell is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteKind {
    Placeholder,
    Empty,
}

impl fmt::Display for IncompleteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "Contains placeholder text"),
            Self::Empty => write!(f, "Empty content"),
        }
    }
}

/// An incomplete cell, located by its 1-based sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessIssue {
    /// Sheet row number, counting the header as row 1.
    pub row: usize,
    pub deliverable: String,
    pub field: String,
    pub market: String,
    pub issue: IncompleteKind,
}

/// Flag placeholder and empty cells for every row and market.
pub fn validate_completeness(rows: &[ContentRow], markets: &[String]) -> Vec<CompletenessIssue> {
    let mut issues = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        for market in markets {
            let content = row.content_for(market);
            let kind = if content.trim().is_empty() {
                IncompleteKind::Empty
            } else if is_placeholder(content) {
                IncompleteKind::Placeholder
            } else {
                continue;
            };
            issues.push(CompletenessIssue {
                row: index + 2,
                deliverable: row.deliverable.clone(),
                field: row.field.clone(),
                market: market.clone(),
                issue: kind,
            });
        }
    }
    issues
}
