//! Emit shaping: sheets and document blocks handed to the writers.
//!
//! Placeholders are substituted here and nowhere else. Under the default
//! [`PlaceholderPolicy::MissingOnly`] only cells that were never seen get
//! one; blank cells stay blank.

use copydeck_catalog::{Catalog, DeliverableTemplate, Market};
use copydeck_common_config::PlaceholderPolicy;
use copydeck_common_core::{AssetRequirement, Block, Cell, CellState, ContentRow, Worksheet};

use crate::tall::{TallDocument, TallField};

/// Copy sheet name.
pub const COPY_TAB: &str = "Copy Template";
/// Requirements sheet name.
pub const REQUIREMENTS_TAB: &str = "Asset Requirements";

/// Requirements sheet header.
pub const REQUIREMENTS_HEADER: [&str; 8] = [
    "Deliverable",
    "Asset Name",
    "Width (px)",
    "Height (px)",
    "Max File Size",
    "Formats",
    "Filename Format",
    "Notes",
];

/// Spreadsheet placeholder for a market cell.
pub fn cell_placeholder(market: &str) -> String {
    format!("[{market} translation needed]")
}

/// Document placeholder for a field value.
pub fn field_placeholder(field: &str) -> String {
    format!("[{field} translation needed]")
}

/// Whether text is an unfilled placeholder.
pub fn is_placeholder(text: &str) -> bool {
    text.contains('[') && text.contains("translation needed")
}

fn needs_placeholder(state: CellState<'_>, policy: PlaceholderPolicy) -> bool {
    match state {
        CellState::Missing => true,
        CellState::Blank => policy == PlaceholderPolicy::MissingAndBlank,
        CellState::Filled(_) => false,
    }
}

/// Copy sheet: `Deliverable`, `Name`, then one column per market in the given order.
pub fn copy_sheet(rows: &[ContentRow], markets: &[String], policy: PlaceholderPolicy) -> Worksheet {
    let mut sheet = Worksheet::new(COPY_TAB);
    sheet.push_row(
        ["Deliverable", "Name"]
            .into_iter()
            .map(str::to_string)
            .chain(markets.iter().cloned()),
    );

    for row in rows {
        let mut cells = vec![Cell::from(row.deliverable.as_str()), Cell::from(row.field.as_str())];
        for market in markets {
            let state = row.cell(market);
            let text = if needs_placeholder(state, policy) {
                cell_placeholder(market)
            } else {
                row.content_for(market).to_string()
            };
            cells.push(Cell::from(text));
        }
        sheet.rows.push(cells);
    }
    sheet
}

/// Requirement rows for every asset of the selected deliverables.
pub fn requirements_from_catalog(deliverables: &[&DeliverableTemplate]) -> Vec<AssetRequirement> {
    deliverables
        .iter()
        .flat_map(|d| {
            d.assets.iter().map(move |asset| AssetRequirement {
                deliverable: d.name.clone(),
                asset_name: asset.name.clone(),
                width: Some(asset.width),
                height: Some(asset.height),
                max_file_size: asset.max_file_size_label(),
                formats: asset.formats_label(),
                filename_format: asset.filename_format.clone(),
                notes: asset.notes.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Requirements sheet with its fixed header.
pub fn requirements_sheet(requirements: &[AssetRequirement]) -> Worksheet {
    let mut sheet = Worksheet::new(REQUIREMENTS_TAB);
    sheet.push_row(REQUIREMENTS_HEADER);
    for req in requirements {
        sheet.rows.push(vec![
            Cell::from(req.deliverable.as_str()),
            Cell::from(req.asset_name.as_str()),
            req.width.map(Cell::from).unwrap_or_default(),
            req.height.map(Cell::from).unwrap_or_default(),
            Cell::from(req.max_file_size.as_str()),
            Cell::from(req.formats.as_str()),
            Cell::from(req.filename_format.as_str()),
            Cell::from(req.notes.as_str()),
        ]);
    }
    sheet
}

/// Framing around a per-market document.
#[derive(Debug, Clone)]
pub struct WordFraming {
    /// Name of the deliverable set, used in the title.
    pub title: String,
    pub market: Market,
    pub template_version: String,
}

/// Instructions shown at the top of every document.
pub const INSTRUCTIONS: &str = "Instructions: Fill in the localized copy for each section below. \
Use the section headers to organize your content. This document will be converted to a \
localization spreadsheet once complete.";

fn field_text(field: &TallField, policy: PlaceholderPolicy) -> String {
    let state = match (field.seen, field.content.trim().is_empty()) {
        (false, _) => CellState::Missing,
        (true, true) => CellState::Blank,
        (true, false) => CellState::Filled(&field.content),
    };
    if needs_placeholder(state, policy) {
        field_placeholder(&field.name)
    } else {
        field.content.clone()
    }
}

/// Document blocks for one market.
///
/// Sections become level-1 headings. When the catalog nests a section, a
/// level-2 heading opens each subsection. Framing paragraphs come before the
/// first section and the footer carries no `label:` text, so re-parsing the
/// output yields only field paragraphs.
pub fn word_blocks(
    document: &TallDocument,
    framing: &WordFraming,
    catalog: &Catalog,
    policy: PlaceholderPolicy,
) -> Vec<Block> {
    let mut blocks = vec![
        Block::paragraph(format!("{} - Marketing Copy Template", framing.title)),
        Block::paragraph(format!(
            "Language: {} ({})",
            framing.market.name, framing.market.code
        )),
        Block::paragraph(INSTRUCTIONS),
    ];

    for section in &document.sections {
        blocks.push(Block::heading(1, &section.name));
        let nested = catalog
            .find_section(&section.name)
            .map(|(_, s)| s)
            .filter(|s| s.is_nested());

        let mut open_subsection: Option<&str> = None;
        for field in &section.fields {
            if let Some(catalog_section) = nested {
                let subsection = catalog_section
                    .subsections
                    .iter()
                    .find(|sub| sub.fields.contains(&field.name))
                    .map(|sub| sub.name.as_str());
                if subsection.is_some() && subsection != open_subsection {
                    if let Some(name) = subsection {
                        blocks.push(Block::heading(2, name));
                    }
                    open_subsection = subsection;
                }
            }
            blocks.push(Block::paragraph(format!(
                "{}: {}",
                field.name,
                field_text(field, policy)
            )));
        }
    }

    blocks.push(Block::paragraph(format!(
        "Template Version {} | Language {}",
        framing.template_version, framing.market.code
    )));
    blocks
}
