//! Field-label synonym table used by reconciliation.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

const BUILTIN_SYNONYMS: &str = include_str!("../data/synonyms.yaml");

/// Canonical field name to the alternative labels copywriters use for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: IndexMap<String, Vec<String>>,
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

impl SynonymTable {
    /// Build a table; alternatives are stored normalized.
    pub fn new(entries: IndexMap<String, Vec<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(canonical, alts)| (canonical, alts.iter().map(|a| normalize(a)).collect()))
            .collect();
        Self { entries }
    }

    /// The table shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml(BUILTIN_SYNONYMS)
    }

    /// Parse a table from YAML text.
    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        let entries: IndexMap<String, Vec<String>> =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
                what: "synonym",
                message: e.to_string(),
            })?;
        Ok(Self::new(entries))
    }

    /// Load a table from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Canonical names whose alternatives include the label, in table order.
    pub fn canonicals_for<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a str> + 'a {
        let label = normalize(label);
        self.entries
            .iter()
            .filter(move |(_, alts)| alts.iter().any(|a| *a == label))
            .map(|(canonical, _)| canonical.as_str())
    }

    /// Number of canonical entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
