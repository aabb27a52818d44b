//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CopydeckConfig {
    /// Reference data overrides.
    pub catalog: CatalogConfig,
    /// Export behaviour.
    pub export: ExportConfig,
    /// Upload limits.
    pub import: ImportConfig,
    /// QA assistant settings.
    pub qa: QaConfig,
}

/// Paths to replacement reference data. Unset paths use the built-in data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Deliverable catalog YAML.
    pub deliverables: Option<PathBuf>,
    /// Market registry YAML.
    pub markets: Option<PathBuf>,
    /// Field synonym table YAML.
    pub synonyms: Option<PathBuf>,
}

/// How emitters fill cells that carry no text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    /// Only cells never seen for a market get a placeholder; blank cells stay blank.
    #[default]
    MissingOnly,
    /// Missing and blank cells both get a placeholder.
    MissingAndBlank,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Placeholder substitution rule.
    pub placeholder_policy: PlaceholderPolicy,
    /// Market placed first in exported columns.
    pub lead_market: Option<String>,
    /// Version stamped into generated document footers.
    pub template_version: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            placeholder_policy: PlaceholderPolicy::default(),
            lead_market: None,
            template_version: "1.0".to_string(),
        }
    }
}

/// Upload limits for batch imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Maximum files per batch.
    pub max_files: usize,
    /// Maximum size of a single file, in megabytes.
    pub max_file_size_mb: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_file_size_mb: 10,
        }
    }
}

/// QA assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Model identifier sent to the language-model service.
    pub model: String,
    /// Base URL of the messages API.
    pub api_base: String,
    /// Token budget for batch analysis.
    pub max_tokens_batch: u32,
    /// Token budget for chat replies.
    pub max_tokens_chat: u32,
    /// Per-caller request limits.
    pub rate_limit: RateLimitConfig,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            api_base: "https://api.anthropic.com".to_string(),
            max_tokens_batch: 4000,
            max_tokens_chat: 2000,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Fixed-window request limit applied per caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window_secs: 3600,
        }
    }
}
