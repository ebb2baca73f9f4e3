//! Vietnam Provinces - Administrative Division Resolver
//!
//! Vietnam reorganised its administrative divisions on 2025-07-01: the three-level
//! province/district/ward hierarchy became a two-level province/ward one, and most provinces and
//! wards were merged. This crate looks up divisions of both schemes by code or by name and
//! bridges between them in either direction.
//!
//! # Quick Start
//!
//! ```rust
//! use vietnam_provinces::DivisionSearcher;
//! use vietnam_provinces::data::test_data::sample_dataset;
//!
//! let searcher = DivisionSearcher::from_dataset(&sample_dataset())?;
//!
//! // Diacritics, case and type prefixes are optional in queries.
//! let wards = searcher.search_wards("phu my");
//! assert_eq!(wards[0].name, "Phường Phú Mỹ");
//!
//! // Where did a legacy ward go?
//! for hit in searcher.search_wards_from_legacy_with_source("Phú Mỹ") {
//!     println!("{} (from legacy ward {})", hit.division.name, hit.source_code);
//! }
//!
//! // And where did a current ward come from?
//! let sources = searcher.ward_legacy_sources(22750);
//! assert_eq!(sources.len(), 3);
//! # Ok::<(), vietnam_provinces::error::ProvincesError>(())
//! ```
//!
//! # Searching
//!
//! - **Name search**: a candidate must contain every query word as a whole word, so "Phú Mỹ"
//!   never matches "Phước Mỹ". Hits are ranked by how exactly they match.
//! - **Legacy to current**: a legacy code or name is mapped through the conversion table; on
//!   equal text matches towns rank before wards, and wards before communes.
//! - **Provenance**: every current ward and province lists the legacy units merged into it.
//!
//! Searches never fail: an empty query or an unknown code gives an empty result. Direct code
//! lookups such as [`DivisionSearcher::ward`] return a `NotFound` error instead.
//!
//! # Data
//!
//! [`DivisionSearcher::initialize`] reads `divisions.json` from the directory named by
//! `VN_PROVINCES_DATA_DIR` (default `./vn_provinces_data`). Any [`data::DivisionDataset`] can be
//! used directly with [`DivisionSearcher::from_dataset`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod bridge;
mod config;
mod core;
pub mod error;
pub mod registry;
pub mod search;

pub use crate::core::DivisionSearcher;

pub use bridge::{ConversionBridge, Direction};
pub use config::SearchConfigBuilder;
pub use registry::{CurrentRegistry, Division, LegacyRegistry, Registry, current, legacy};
pub use search::{
    DistrictResolution, FromLegacy, LegacyQuery, MatchScorer, SearchConfig, TypeBonus, normalize,
    normalize_for, normalize_province,
};
pub use vietnam_provinces_data as data;
pub use vietnam_provinces_data::{DivisionKind, DivisionType, Scheme};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the resolver.
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this more than once is harmless.
///
/// ```rust
/// use tracing::Level;
/// use vietnam_provinces::init_logging;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), vietnam_provinces::error::ProvincesError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::ProvincesError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_data::sample_dataset;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        setup_test_env();
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[test]
    fn test_searcher_creation() {
        setup_test_env();

        let searcher = DivisionSearcher::from_dataset(&sample_dataset());
        assert!(
            searcher.is_ok(),
            "Should be able to create searcher with sample data"
        );
    }

    #[test]
    fn test_basic_search() {
        setup_test_env();

        let searcher = DivisionSearcher::from_dataset(&sample_dataset()).unwrap();

        for term in ["Khánh Hòa", "khanh hoa", "Tỉnh Khánh Hòa", "KHÁNH HÒA"] {
            let results = searcher.search_provinces(term);
            assert_eq!(results.len(), 1, "Expected one province for '{term}'");
            assert_eq!(results[0].code, 56);
        }
    }
}
