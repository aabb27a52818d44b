//! Catalog listing command.

use clap::Parser;
use indexmap::IndexMap;
use serde::Serialize;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// List deliverables or markets
#[derive(Debug, Parser)]
pub struct CatalogCommand {
    /// List markets grouped by region instead of deliverables
    #[arg(long)]
    pub markets: bool,

    /// Show sections and fields of one deliverable
    #[arg(long, conflicts_with = "markets")]
    pub show: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeliverableSummary {
    name: String,
    description: String,
    fields: usize,
    assets: usize,
}

#[derive(Debug, Serialize)]
struct DeliverableListing(IndexMap<String, Vec<DeliverableSummary>>);

impl FormattedOutput for DeliverableListing {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for (category, deliverables) in &self.0 {
            out.push_str(&format!("{category}\n"));
            for d in deliverables {
                out.push_str(&format!(
                    "  {:<24} {:>2} fields, {} assets  {}\n",
                    d.name, d.fields, d.assets, d.description
                ));
            }
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Serialize)]
struct MarketEntry {
    code: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct MarketListing(IndexMap<String, Vec<MarketEntry>>);

impl FormattedOutput for MarketListing {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for (region, markets) in &self.0 {
            out.push_str(&format!("{region}\n"));
            for m in markets {
                out.push_str(&format!("  {:<8} {}\n", m.code, m.name));
            }
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Serialize)]
struct SectionDetail {
    name: String,
    /// `(subsection, field)` pairs; the subsection is empty for flat sections.
    fields: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
struct DeliverableDetail {
    name: String,
    sections: Vec<SectionDetail>,
}

impl FormattedOutput for DeliverableDetail {
    fn format_text(&self) -> String {
        let mut out = format!("{}\n", self.name);
        for section in &self.sections {
            out.push_str(&format!("  {}\n", section.name));
            for (subsection, field) in &section.fields {
                if subsection.is_empty() {
                    out.push_str(&format!("    {field}\n"));
                } else {
                    out.push_str(&format!("    {subsection} / {field}\n"));
                }
            }
        }
        out.trim_end().to_string()
    }
}

impl CatalogCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let reference = &ctx.reference;

        if self.markets {
            let listing = reference
                .markets
                .by_region()
                .into_iter()
                .map(|(region, markets)| {
                    let entries = markets
                        .into_iter()
                        .map(|m| MarketEntry {
                            code: m.code.clone(),
                            name: m.name.clone(),
                        })
                        .collect();
                    (region.to_string(), entries)
                })
                .collect();
            return print_output(ctx, &MarketListing(listing));
        }

        if let Some(name) = &self.show {
            let deliverable = reference.catalog.get(name).ok_or_else(|| {
                CliError::not_found_with_suggestions(
                    "Deliverable",
                    name,
                    reference.catalog.names().map(str::to_string).collect(),
                )
            })?;
            let detail = DeliverableDetail {
                name: deliverable.name.clone(),
                sections: deliverable
                    .sections
                    .iter()
                    .map(|section| SectionDetail {
                        name: section.name.clone(),
                        fields: if section.is_nested() {
                            section
                                .subsections
                                .iter()
                                .flat_map(|sub| {
                                    sub.fields.iter().map(|f| (sub.name.clone(), f.clone()))
                                })
                                .collect()
                        } else {
                            section
                                .fields
                                .iter()
                                .map(|f| (String::new(), f.clone()))
                                .collect()
                        },
                    })
                    .collect(),
            };
            return print_output(ctx, &detail);
        }

        let listing = reference
            .catalog
            .by_category()
            .into_iter()
            .map(|(category, deliverables)| {
                let summaries = deliverables
                    .into_iter()
                    .map(|d| DeliverableSummary {
                        name: d.name.clone(),
                        description: d.description.clone(),
                        fields: d.field_count(),
                        assets: d.assets.len(),
                    })
                    .collect();
                (category.to_string(), summaries)
            })
            .collect();
        print_output(ctx, &DeliverableListing(listing))
    }
}
