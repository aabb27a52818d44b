//! Deliverable templates: the region-free copy schema.

use serde::{Deserialize, Serialize};

/// A named marketing deliverable and the copy slots it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverableTemplate {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A section holds either flat fields or nested subsections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Subsection>,
}

/// A named group of fields inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub name: String,
    pub fields: Vec<String>,
}

/// Image or video asset specification attached to a deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub max_file_size_mb: f64,
    pub formats: Vec<String>,
    pub filename_format: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Section {
    /// Whether this section nests its fields under subsections.
    pub fn is_nested(&self) -> bool {
        !self.subsections.is_empty()
    }

    /// Field names in traversal order, flattening subsections.
    pub fn field_names(&self) -> Vec<&str> {
        if self.is_nested() {
            self.subsections
                .iter()
                .flat_map(|sub| sub.fields.iter().map(String::as_str))
                .collect()
        } else {
            self.fields.iter().map(String::as_str).collect()
        }
    }

    /// Owned copy of [`Section::field_names`].
    pub fn expected_fields(&self) -> Vec<String> {
        self.field_names().into_iter().map(str::to_string).collect()
    }
}

impl DeliverableTemplate {
    /// `(section, field)` slots in catalog order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.sections.iter().flat_map(|section| {
            section
                .field_names()
                .into_iter()
                .map(move |field| (section.name.as_str(), field))
        })
    }

    /// Section with the given name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total number of copy slots.
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.field_names().len()).sum()
    }
}

impl Asset {
    /// Max size as rendered in the requirements tab, e.g. `"5 MB"`.
    pub fn max_file_size_label(&self) -> String {
        format!("{} MB", self.max_file_size_mb)
    }

    /// Formats joined for display, e.g. `"JPG, PNG"`.
    pub fn formats_label(&self) -> String {
        self.formats.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Section {
        Section {
            name: "Features".into(),
            fields: vec![],
            subsections: vec![
                Subsection {
                    name: "A".into(),
                    fields: vec!["Title A".into(), "Body A".into()],
                },
                Subsection {
                    name: "B".into(),
                    fields: vec!["Title B".into()],
                },
            ],
        }
    }

    #[test]
    fn test_nested_field_names_flatten_in_order() {
        assert_eq!(nested().field_names(), vec!["Title A", "Body A", "Title B"]);
    }

    #[test]
    fn test_slots_follow_section_order() {
        let template = DeliverableTemplate {
            name: "Page".into(),
            category: String::new(),
            description: String::new(),
            sections: vec![
                Section {
                    name: "Hero".into(),
                    fields: vec!["Headline".into()],
                    subsections: vec![],
                },
                nested(),
            ],
            assets: vec![],
        };

        let slots: Vec<_> = template.slots().collect();
        assert_eq!(
            slots,
            vec![
                ("Hero", "Headline"),
                ("Features", "Title A"),
                ("Features", "Body A"),
                ("Features", "Title B"),
            ]
        );
        assert_eq!(template.field_count(), 4);
    }

    #[test]
    fn test_asset_labels() {
        let asset = Asset {
            name: "Hero".into(),
            width: 10,
            height: 10,
            max_file_size_mb: 5.0,
            formats: vec!["JPG".into(), "PNG".into()],
            filename_format: "x.jpg".into(),
            notes: None,
        };
        assert_eq!(asset.max_file_size_label(), "5 MB");
        assert_eq!(asset.formats_label(), "JPG, PNG");
    }
}
