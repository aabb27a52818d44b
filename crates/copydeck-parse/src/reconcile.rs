//! Field reconciliation: match free-text labels to catalog field names.

use copydeck_catalog::SynonymTable;
use copydeck_common_core::ParsedField;

/// Confidence below this marks a match as low confidence.
pub const LOW_CONFIDENCE: f64 = 0.8;

const EXACT: f64 = 1.0;
const CASE_INSENSITIVE: f64 = 0.95;
const SYNONYM: f64 = 0.8;
const UNMATCHED: f64 = 0.0;

/// Outcome of reconciling one label.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    /// Catalog spelling when matched, otherwise the label as given.
    pub name: String,
    pub confidence: f64,
}

impl FieldMatch {
    pub fn is_low_confidence(&self) -> bool {
        self.confidence < LOW_CONFIDENCE
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Matches labels against an expected field list; first rule wins.
///
/// 1. exact, case-sensitive: 1.0
/// 2. trimmed, case-insensitive: 0.95
/// 3. synonym of an expected canonical field: 0.8
/// 4. no match: the label itself at 0.0
#[derive(Debug, Clone, Copy)]
pub struct FieldReconciler<'a> {
    synonyms: &'a SynonymTable,
}

impl<'a> FieldReconciler<'a> {
    pub fn new(synonyms: &'a SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Reconcile a single label.
    pub fn reconcile(&self, label: &str, expected: &[String]) -> FieldMatch {
        if expected.iter().any(|f| f == label) {
            return FieldMatch {
                name: label.to_string(),
                confidence: EXACT,
            };
        }

        let normalized = normalize(label);
        if let Some(found) = expected.iter().find(|f| normalize(f) == normalized) {
            return FieldMatch {
                name: found.clone(),
                confidence: CASE_INSENSITIVE,
            };
        }

        for canonical in self.synonyms.canonicals_for(label) {
            let canonical = normalize(canonical);
            if let Some(found) = expected.iter().find(|f| normalize(f) == canonical) {
                return FieldMatch {
                    name: found.clone(),
                    confidence: SYNONYM,
                };
            }
        }

        FieldMatch {
            name: label.to_string(),
            confidence: UNMATCHED,
        }
    }

    /// Reconcile a parsed field, keeping the written label when it was not an exact match.
    pub fn reconcile_field(&self, field: ParsedField, expected: &[String]) -> ParsedField {
        let matched = self.reconcile(&field.name, expected);
        let original_name = (matched.confidence < EXACT).then_some(field.name);
        ParsedField {
            name: matched.name,
            content: field.content,
            confidence: matched.confidence,
            original_name,
        }
    }
}

/// Warning text for a low-confidence field, if it is one.
pub fn low_confidence_warning(field: &ParsedField) -> Option<String> {
    if field.confidence >= LOW_CONFIDENCE {
        return None;
    }
    let original = field.original_name.as_deref().unwrap_or(&field.name);
    Some(format!(
        "Low confidence match: \"{}\" → \"{}\" ({}%)",
        original,
        field.name,
        (field.confidence * 100.0).round() as i64
    ))
}
