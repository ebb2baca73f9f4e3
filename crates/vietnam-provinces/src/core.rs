//! The [`DivisionSearcher`] entry point.
//!
//! A searcher owns the two registries and the conversion bridge behind `Arc`s. It is built
//! once, never mutated, and cheap to clone and share across threads.
//!
//! ```rust
//! use vietnam_provinces::DivisionSearcher;
//! use vietnam_provinces::data::test_data::sample_dataset;
//!
//! let searcher = DivisionSearcher::from_dataset(&sample_dataset())?;
//!
//! // Legacy ward 26707 became a single current ward.
//! let wards = searcher.search_wards_from_legacy(26707);
//! assert_eq!(wards[0].name, "Phường Tân Hải");
//!
//! // Every current ward that absorbed part of a dissolved legacy district.
//! let wards = searcher.search_wards_from_legacy_district(582);
//! assert_eq!(wards.len(), 6);
//! # Ok::<(), vietnam_provinces::error::ProvincesError>(())
//! ```
use std::{path::Path, sync::Arc};

use anyhow::Context;
use once_cell::sync::OnceCell;
use tracing::{info, instrument};
use vietnam_provinces_data::{DATA_DIR, DivisionDataset, default_dataset_path};

use crate::{
    bridge::ConversionBridge,
    error::Result,
    registry::{
        CurrentRegistry, LegacyRegistry,
        current::{Province, Ward},
        legacy,
    },
    search::{
        FromLegacy, LegacyQuery, SearchConfig, province_legacy_sources_inner,
        provinces_from_legacy_inner, search_inner, ward_legacy_sources_inner,
        wards_from_legacy_district_inner, wards_from_legacy_inner,
    },
};

static SHARED: OnceCell<DivisionSearcher> = OnceCell::new();

fn divisions<'a, T>(hits: Vec<FromLegacy<'a, T>>) -> Vec<&'a T> {
    hits.into_iter().map(|hit| hit.division).collect()
}

/// Resolver and search engine over both schemes.
///
/// Code lookups (`province`, `legacy_ward`, ...) fail with a `NotFound` registry error for
/// unknown codes. Every `search*` method returns an empty vector instead.
#[derive(Clone)]
pub struct DivisionSearcher {
    current: Arc<CurrentRegistry>,
    legacy: Arc<LegacyRegistry>,
    bridge: Arc<ConversionBridge>,
    config: SearchConfig,
}

impl DivisionSearcher {
    /// Build registries and conversion tables from a validated dataset.
    #[instrument(name = "Build DivisionSearcher", level = "info", skip_all)]
    pub fn from_dataset(dataset: &DivisionDataset) -> Result<Self> {
        Self::from_dataset_with_config(dataset, SearchConfig::default())
    }

    pub fn from_dataset_with_config(
        dataset: &DivisionDataset,
        config: SearchConfig,
    ) -> Result<Self> {
        let t_init = std::time::Instant::now();

        let current = CurrentRegistry::from_records(&dataset.current)?;
        let legacy = LegacyRegistry::from_records(&dataset.legacy)?;
        let bridge = ConversionBridge::from_rows(&dataset.ward_conversion);

        info!(
            elapsed_seconds = ?t_init.elapsed(),
            "DivisionSearcher ready"
        );
        Ok(Self::from_components(current, legacy, bridge).with_config(config))
    }

    /// Assemble a searcher from already built parts.
    pub fn from_components(
        current: CurrentRegistry,
        legacy: LegacyRegistry,
        bridge: ConversionBridge,
    ) -> Self {
        Self {
            current: Arc::new(current),
            legacy: Arc::new(legacy),
            bridge: Arc::new(bridge),
            config: SearchConfig::default(),
        }
    }

    /// Load a dataset file and build from it.
    #[instrument(name = "Load DivisionSearcher", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let dataset = DivisionDataset::from_path(path)?;
        Self::from_dataset(&dataset)
    }

    /// Build from `divisions.json` in the configured data directory.
    pub fn initialize() -> Result<Self> {
        let dataset = DivisionDataset::from_path(default_dataset_path()).with_context(|| {
            format!(
                "Failed to load the division dataset from {}",
                DATA_DIR.display()
            )
        })?;
        Self::from_dataset(&dataset)
    }

    /// Process-wide searcher, built by [`Self::initialize`] on first use.
    pub fn shared() -> Result<&'static Self> {
        SHARED.get_or_try_init(Self::initialize)
    }

    /// Same tables, different search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn current(&self) -> &CurrentRegistry {
        &self.current
    }

    pub fn legacy(&self) -> &LegacyRegistry {
        &self.legacy
    }

    pub fn bridge(&self) -> &ConversionBridge {
        &self.bridge
    }

    // Current scheme

    pub fn province(&self, code: u32) -> Result<&Province> {
        Ok(self.current.provinces().by_code(code)?)
    }

    pub fn ward(&self, code: u32) -> Result<&Ward> {
        Ok(self.current.wards().by_code(code)?)
    }

    pub fn search_provinces(&self, name: &str) -> Vec<&Province> {
        search_inner(self.current.provinces(), name, &self.config)
    }

    pub fn search_wards(&self, name: &str) -> Vec<&Ward> {
        search_inner(self.current.wards(), name, &self.config)
    }

    // Legacy scheme

    pub fn legacy_province(&self, code: u32) -> Result<&legacy::Province> {
        Ok(self.legacy.provinces().by_code(code)?)
    }

    pub fn legacy_district(&self, code: u32) -> Result<&legacy::District> {
        Ok(self.legacy.districts().by_code(code)?)
    }

    pub fn legacy_ward(&self, code: u32) -> Result<&legacy::Ward> {
        Ok(self.legacy.wards().by_code(code)?)
    }

    pub fn search_legacy_provinces(&self, name: &str) -> Vec<&legacy::Province> {
        search_inner(self.legacy.provinces(), name, &self.config)
    }

    pub fn search_legacy_districts(&self, name: &str) -> Vec<&legacy::District> {
        search_inner(self.legacy.districts(), name, &self.config)
    }

    pub fn search_legacy_wards(&self, name: &str) -> Vec<&legacy::Ward> {
        search_inner(self.legacy.wards(), name, &self.config)
    }

    // Bridging

    /// Current provinces from a legacy province code or name.
    pub fn search_provinces_from_legacy<'q>(
        &self,
        query: impl Into<LegacyQuery<'q>>,
    ) -> Vec<&Province> {
        divisions(self.search_provinces_from_legacy_with_source(query))
    }

    pub fn search_provinces_from_legacy_with_source<'q>(
        &self,
        query: impl Into<LegacyQuery<'q>>,
    ) -> Vec<FromLegacy<'_, Province>> {
        provinces_from_legacy_inner(
            &self.current,
            &self.legacy,
            &self.bridge,
            query.into(),
            &self.config,
        )
    }

    /// Current wards from a legacy ward code or name.
    ///
    /// A code yields the wards it was converted into, in table order. A name is matched
    /// word by word against legacy ward names and the reached current wards are ranked, town
    /// before ward before commune on equal text matches.
    pub fn search_wards_from_legacy<'q>(&self, query: impl Into<LegacyQuery<'q>>) -> Vec<&Ward> {
        divisions(self.search_wards_from_legacy_with_source(query))
    }

    pub fn search_wards_from_legacy_with_source<'q>(
        &self,
        query: impl Into<LegacyQuery<'q>>,
    ) -> Vec<FromLegacy<'_, Ward>> {
        wards_from_legacy_inner(
            &self.current,
            &self.legacy,
            &self.bridge,
            query.into(),
            &self.config,
        )
    }

    /// Current wards that took in any legacy ward of a district, ascending by code.
    pub fn search_wards_from_legacy_district<'q>(
        &self,
        query: impl Into<LegacyQuery<'q>>,
    ) -> Vec<&Ward> {
        divisions(self.search_wards_from_legacy_district_with_source(query))
    }

    pub fn search_wards_from_legacy_district_with_source<'q>(
        &self,
        query: impl Into<LegacyQuery<'q>>,
    ) -> Vec<FromLegacy<'_, Ward>> {
        wards_from_legacy_district_inner(
            &self.current,
            &self.legacy,
            &self.bridge,
            query.into(),
            &self.config,
        )
    }

    /// Legacy wards merged into current ward `code`, in conversion-table order.
    pub fn ward_legacy_sources(&self, code: u32) -> Vec<&legacy::Ward> {
        ward_legacy_sources_inner(&self.legacy, &self.bridge, code)
    }

    /// Legacy provinces merged into current province `code`, ascending by code.
    pub fn province_legacy_sources(&self, code: u32) -> Vec<&legacy::Province> {
        province_legacy_sources_inner(&self.legacy, &self.bridge, code)
    }
}

impl std::fmt::Debug for DivisionSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DivisionSearcher")
            .field("current_wards", &self.current.wards().len())
            .field("legacy_wards", &self.legacy.wards().len())
            .field("conversions", &self.bridge.wards().stats())
            .field("config", &self.config)
            .finish()
    }
}
