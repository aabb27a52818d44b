//! Market selection and column ordering.

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};

/// Order market codes for emission: the lead first, the rest ascending.
///
/// Duplicate codes are dropped. A lead that is not in `markets` is ignored.
pub fn order_markets(markets: &[String], lead: Option<&str>) -> Vec<String> {
    let mut rest: Vec<String> = markets
        .iter()
        .filter(|m| Some(m.as_str()) != lead)
        .cloned()
        .collect();
    rest.sort();
    rest.dedup();

    match lead {
        Some(lead) if markets.iter().any(|m| m == lead) => {
            let mut ordered = Vec::with_capacity(rest.len() + 1);
            ordered.push(lead.to_string());
            ordered.extend(rest);
            ordered
        }
        _ => rest,
    }
}

/// A project's non-empty market selection with an optional lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSelection {
    markets: Vec<String>,
    lead: Option<String>,
}

impl MarketSelection {
    /// Validate a selection: non-empty, and the lead must be selected.
    pub fn new(markets: Vec<String>, lead: Option<String>) -> TransformResult<Self> {
        if markets.is_empty() {
            return Err(TransformError::EmptyMarketSelection);
        }
        if let Some(lead) = &lead {
            if !markets.contains(lead) {
                return Err(TransformError::LeadNotSelected(lead.clone()));
            }
        }
        Ok(Self { markets, lead })
    }

    pub fn lead(&self) -> Option<&str> {
        self.lead.as_deref()
    }

    /// Codes as selected.
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// Codes in emission order.
    pub fn ordered(&self) -> Vec<String> {
        order_markets(&self.markets, self.lead.as_deref())
    }
}
