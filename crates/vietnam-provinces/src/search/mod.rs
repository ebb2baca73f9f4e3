//! Name matching and the search operations built on it.
//!
//! [`normalize`] canonicalises names, [`MatchScorer`] ranks a candidate against a query and
//! the orchestration functions combine both with the registries and the conversion bridge.

pub mod normalize;
mod score;
mod search_orchestration;

pub use normalize::{NormalizedQuery, normalize, normalize_for, normalize_province};
pub use score::{MatchScorer, TypeBonus};
pub use search_orchestration::{
    DistrictResolution, FromLegacy, LegacyQuery, SearchConfig, province_legacy_sources_inner,
    provinces_from_legacy_inner, search_inner, ward_legacy_sources_inner,
    wards_from_legacy_district_inner, wards_from_legacy_inner,
};
