//! Market registry: known language/region targets.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

const BUILTIN_MARKETS: &str = include_str!("../data/markets.yaml");

/// A language and region target such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    pub code: String,
    /// Display name, usually "Language (Region)".
    pub name: String,
    /// Grouping key for selection lists.
    #[serde(default)]
    pub region: String,
}

impl Market {
    /// Stand-in for a code the registry does not know.
    pub fn unregistered(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: code.to_string(),
            region: String::new(),
        }
    }

    /// Language prefix of the code, e.g. `"en"` for `"en-US"`.
    pub fn language(&self) -> &str {
        language_of(&self.code)
    }
}

/// Language prefix of a market code: everything before the first `-`.
pub fn language_of(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Immutable set of known markets, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRegistry {
    markets: Vec<Market>,
}

impl MarketRegistry {
    /// Build a registry, rejecting duplicate codes.
    pub fn new(markets: Vec<Market>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for market in &markets {
            if !seen.insert(market.code.as_str()) {
                return Err(CatalogError::DuplicateMarket(market.code.clone()));
            }
        }
        Ok(Self { markets })
    }

    /// The registry shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml(BUILTIN_MARKETS)
    }

    /// Parse a registry from YAML text.
    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        let parsed: MarketRegistry =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
                what: "market",
                message: e.to_string(),
            })?;
        Self::new(parsed.markets)
    }

    /// Load a registry from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// All markets in registry order.
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Look up a market by exact code.
    pub fn get(&self, code: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.code == code)
    }

    /// Whether the code is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Registered market, or an unregistered stand-in named after the code.
    pub fn resolve(&self, code: &str) -> Market {
        self.get(code)
            .cloned()
            .unwrap_or_else(|| Market::unregistered(code))
    }

    /// Markets grouped by region, regions in first-seen order.
    pub fn by_region(&self) -> IndexMap<&str, Vec<&Market>> {
        let mut grouped: IndexMap<&str, Vec<&Market>> = IndexMap::new();
        for market in &self.markets {
            grouped.entry(market.region.as_str()).or_default().push(market);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("en-US", "en" ; "simple")]
    #[test_case("zh-CN", "zh" ; "chinese")]
    #[test_case("custom", "custom" ; "no region")]
    fn test_language_of(code: &str, expected: &str) {
        assert_eq!(language_of(code), expected);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = MarketRegistry::builtin().unwrap();
        let us = registry.get("en-US").unwrap();
        assert_eq!(us.name, "English (United States)");
        assert_eq!(us.language(), "en");
        assert!(!registry.contains("xx-YY"));
    }

    #[test]
    fn test_resolve_unknown_market() {
        let registry = MarketRegistry::builtin().unwrap();
        let market = registry.resolve("xx-YY");
        assert_eq!(market.name, "xx-YY");
        assert_eq!(market.language(), "xx");
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let result = MarketRegistry::new(vec![
            Market::unregistered("en-US"),
            Market::unregistered("en-US"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateMarket(code)) if code == "en-US"));
    }

    #[test]
    fn test_by_region_keeps_registry_order() {
        let registry = MarketRegistry::builtin().unwrap();
        let regions: Vec<_> = registry.by_region().keys().copied().collect();
        assert_eq!(regions[0], "North America");
        assert!(regions.contains(&"Europe"));
    }
}
