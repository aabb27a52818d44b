//! Static reference data for Copydeck.
//!
//! The deliverable catalog, market registry and field synonym table are
//! loaded once at start-up and are read-only afterwards. Built-in copies
//! ship with the crate; each can be replaced from a YAML file named in
//! [`CatalogConfig`].

pub mod catalog;
pub mod deliverable;
pub mod error;
pub mod market;
pub mod synonyms;

pub use catalog::Catalog;
pub use deliverable::{Asset, DeliverableTemplate, Section, Subsection};
pub use error::{CatalogError, CatalogResult};
pub use market::{language_of, Market, MarketRegistry};
pub use synonyms::SynonymTable;

use copydeck_common_config::CatalogConfig;
use tracing::{debug, info};

/// Catalog, market registry and synonyms loaded together.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    /// Deliverable templates.
    pub catalog: Catalog,
    /// Known markets.
    pub markets: MarketRegistry,
    /// Field-label synonyms used during reconciliation.
    pub synonyms: SynonymTable,
}

impl ReferenceData {
    /// Built-in reference data.
    pub fn builtin() -> CatalogResult<Self> {
        Ok(Self {
            catalog: Catalog::builtin()?,
            markets: MarketRegistry::builtin()?,
            synonyms: SynonymTable::builtin()?,
        })
    }

    /// Load reference data, honouring any override paths in the config.
    pub fn load(config: &CatalogConfig) -> CatalogResult<Self> {
        let catalog = match &config.deliverables {
            Some(path) => {
                debug!(path = %path.display(), "Loading deliverable catalog override");
                Catalog::from_path(path)?
            }
            None => Catalog::builtin()?,
        };
        let markets = match &config.markets {
            Some(path) => {
                debug!(path = %path.display(), "Loading market registry override");
                MarketRegistry::from_path(path)?
            }
            None => MarketRegistry::builtin()?,
        };
        let synonyms = match &config.synonyms {
            Some(path) => {
                debug!(path = %path.display(), "Loading synonym table override");
                SynonymTable::from_path(path)?
            }
            None => SynonymTable::builtin()?,
        };

        info!(
            deliverables = catalog.deliverables().len(),
            markets = markets.markets().len(),
            "Reference data loaded"
        );

        Ok(Self {
            catalog,
            markets,
            synonyms,
        })
    }
}
