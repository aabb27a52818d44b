//! The deliverable catalog and its integrity rules.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deliverable::{DeliverableTemplate, Section};
use crate::error::{CatalogError, CatalogResult};

const BUILTIN_DELIVERABLES: &str = include_str!("../data/deliverables.yaml");

/// Ordered, read-only set of deliverable templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    deliverables: Vec<DeliverableTemplate>,
}

impl Catalog {
    /// Build a catalog, checking integrity.
    pub fn new(deliverables: Vec<DeliverableTemplate>) -> CatalogResult<Self> {
        let catalog = Self { deliverables };
        catalog.check_integrity()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml(BUILTIN_DELIVERABLES)
    }

    /// Parse a catalog from YAML text.
    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
            what: "deliverable",
            message: e.to_string(),
        })?;
        catalog.check_integrity()?;
        debug!(deliverables = catalog.deliverables.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Verify deliverable names are unique, each section is either flat or
    /// nested, and `(section, field)` pairs are unique within a deliverable.
    ///
    /// Section names must also be unique across deliverables: content rows
    /// are keyed by section name, so a shared name would merge two
    /// deliverables' fields.
    pub fn check_integrity(&self) -> CatalogResult<()> {
        let mut names = HashSet::new();
        let mut section_owners: HashMap<&str, &str> = HashMap::new();

        for deliverable in &self.deliverables {
            let violation = |message: String| CatalogError::Integrity {
                deliverable: deliverable.name.clone(),
                message,
            };

            if deliverable.name.trim().is_empty() {
                return Err(violation("deliverable name is empty".into()));
            }
            if !names.insert(deliverable.name.as_str()) {
                return Err(violation("duplicate deliverable name".into()));
            }

            let mut slots = HashSet::new();
            for section in &deliverable.sections {
                let owner = *section_owners
                    .entry(section.name.as_str())
                    .or_insert(deliverable.name.as_str());
                if owner != deliverable.name {
                    return Err(violation(format!(
                        "section '{}' is already defined by '{owner}'",
                        section.name
                    )));
                }
                if section.is_nested() && !section.fields.is_empty() {
                    return Err(violation(format!(
                        "section '{}' has both fields and subsections",
                        section.name
                    )));
                }
                for field in section.field_names() {
                    if field.contains(':') {
                        return Err(violation(format!(
                            "field '{field}' in section '{}' contains a colon",
                            section.name
                        )));
                    }
                    if !slots.insert((section.name.as_str(), field)) {
                        return Err(violation(format!(
                            "duplicate field '{field}' in section '{}'",
                            section.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// All deliverables in catalog order.
    pub fn deliverables(&self) -> &[DeliverableTemplate] {
        &self.deliverables
    }

    /// Deliverable names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.deliverables.iter().map(|d| d.name.as_str())
    }

    /// Look up a deliverable by name.
    pub fn get(&self, name: &str) -> Option<&DeliverableTemplate> {
        self.deliverables.iter().find(|d| d.name == name)
    }

    /// Resolve a selection of names, keeping the selection's order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> CatalogResult<Vec<&DeliverableTemplate>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| CatalogError::UnknownDeliverable(name.to_string()))
            })
            .collect()
    }

    /// First catalog section with this exact name, across all deliverables.
    pub fn find_section(&self, section_name: &str) -> Option<(&DeliverableTemplate, &Section)> {
        self.deliverables.iter().find_map(|d| {
            d.section(section_name).map(|section| (d, section))
        })
    }

    /// Deliverables grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> IndexMap<&str, Vec<&DeliverableTemplate>> {
        let mut grouped: IndexMap<&str, Vec<&DeliverableTemplate>> = IndexMap::new();
        for deliverable in &self.deliverables {
            grouped
                .entry(deliverable.category.as_str())
                .or_default()
                .push(deliverable);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_passes_integrity() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.get("Product Detail Page").is_some());
        assert!(catalog.deliverables().len() >= 3);
    }

    #[test]
    fn test_find_section_across_deliverables() {
        let catalog = Catalog::builtin().unwrap();
        let (deliverable, section) = catalog.find_section("Social Ad").unwrap();
        assert_eq!(deliverable.name, "Social Ad");
        assert!(section.field_names().contains(&"cta"));
        assert!(catalog.find_section("Nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_field_in_section_rejected() {
        let yaml = r#"
deliverables:
  - name: Broken
    sections:
      - name: Hero
        fields: [Headline, Headline]
"#;
        match Catalog::from_yaml(yaml) {
            Err(CatalogError::Integrity { deliverable, message }) => {
                assert_eq!(deliverable, "Broken");
                assert!(message.contains("duplicate field"));
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_field_across_subsections_rejected() {
        let yaml = r#"
deliverables:
  - name: Broken
    sections:
      - name: Features
        subsections:
          - name: A
            fields: [Title]
          - name: B
            fields: [Title]
"#;
        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::Integrity { .. })
        ));
    }

    #[test]
    fn test_same_field_in_different_sections_allowed() {
        let yaml = r#"
deliverables:
  - name: Fine
    sections:
      - name: Gallery 1
        fields: [Headline]
      - name: Gallery 2
        fields: [Headline]
"#;
        assert!(Catalog::from_yaml(yaml).is_ok());
    }

    #[test]
    fn test_section_shared_across_deliverables_rejected() {
        let yaml = r#"
deliverables:
  - name: Homepage
    sections:
      - name: Hero
        fields: [Headline]
  - name: Microsite
    sections:
      - name: Hero
        fields: [Body]
"#;
        match Catalog::from_yaml(yaml) {
            Err(CatalogError::Integrity { deliverable, message }) => {
                assert_eq!(deliverable, "Microsite");
                assert!(message.contains("already defined by 'Homepage'"));
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_section_rejected() {
        let yaml = r#"
deliverables:
  - name: Mixed
    sections:
      - name: Hero
        fields: [Headline]
        subsections:
          - name: A
            fields: [Body]
"#;
        assert!(Catalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_select_unknown_deliverable() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.select(&["Product Detail Page", "Billboard"]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDeliverable(name) if name == "Billboard"));
    }

    #[test]
    fn test_select_keeps_selection_order() {
        let catalog = Catalog::builtin().unwrap();
        let selected = catalog.select(&["Social Ad", "Product Detail Page"]).unwrap();
        assert_eq!(selected[0].name, "Social Ad");
        assert_eq!(selected[1].name, "Product Detail Page");
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::builtin().unwrap();
        let grouped = catalog.by_category();
        assert_eq!(grouped["Web"].len(), 2);
    }
}
