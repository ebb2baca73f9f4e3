//! Search algorithms over the registries and the conversion bridge.
//!
//! Every function here is a pure scan over immutable tables. Misses of any kind (empty query,
//! unknown code, dangling conversion reference) end up as an empty or shorter result, never an
//! error.
use std::collections::BTreeMap;

use ahash::AHashSet as HashSet;
use tracing::{debug, instrument, trace, warn};
use vietnam_provinces_data::{ConversionRef, ConversionTable, DivisionKind, OldRef};

use super::{
    normalize::{NormalizedQuery, normalize_for, words},
    score::{MatchScorer, TypeBonus},
};
use crate::{
    SearchConfigBuilder,
    bridge::ConversionBridge,
    registry::{
        CurrentRegistry, Division, LegacyRegistry, Registry,
        current::{Province, Ward},
        legacy,
    },
};

/// How a legacy district given by name is pinned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistrictResolution {
    /// Take the single best-ranked district.
    #[default]
    FirstMatch,
    /// Take every district tied at the best score.
    AllBestMatches,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchConfig {
    /// Truncate ranked name searches. `None` keeps every match.
    pub limit: Option<usize>,
    pub district_resolution: DistrictResolution,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    fn truncate<T>(&self, results: &mut Vec<T>) {
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
    }
}

/// A legacy-side query: a code or a name, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyQuery<'a> {
    Code(u32),
    Name(&'a str),
}

impl LegacyQuery<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Code(code) => *code == 0,
            Self::Name(name) => name.trim().is_empty(),
        }
    }
}

impl From<u32> for LegacyQuery<'_> {
    fn from(code: u32) -> Self {
        Self::Code(code)
    }
}

impl<'a> From<&'a str> for LegacyQuery<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for LegacyQuery<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

/// A current division reached from the legacy scheme, with the legacy code that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FromLegacy<'a, T> {
    pub source_code: u32,
    pub division: &'a T,
}

/// Whole-word containment plus substring containment of the query text.
fn passes(query: &NormalizedQuery, kind: DivisionKind, name: &str) -> bool {
    let normalized = normalize_for(kind, name);
    let candidate_words: HashSet<&str> = words(&normalized).collect();
    query.matches_words(&candidate_words) && normalized.contains(query.text.as_str())
}

/// Whole-word filter then score, stable in registry order for equal scores.
pub(crate) fn rank_by_name<'a, T: Division>(
    registry: &'a Registry<T>,
    raw_query: &str,
    bonus: TypeBonus,
) -> Vec<(u32, &'a T)> {
    let Some(query) = NormalizedQuery::parse(T::KIND, raw_query) else {
        debug!(query = raw_query, kind = %T::KIND, "Empty search query");
        return Vec::new();
    };
    let scorer = MatchScorer::new(T::KIND, bonus);

    let mut ranked: Vec<(u32, &T)> = registry
        .all()
        .filter(|candidate| passes(&query, T::KIND, candidate.name()))
        .filter_map(|candidate| {
            scorer
                .score(
                    raw_query,
                    &query.text,
                    candidate.name(),
                    candidate.division_type(),
                )
                .map(|score| (score, candidate))
        })
        .collect();
    ranked.sort_by_key(|(score, _)| *score);
    trace!(query = raw_query, hits = ranked.len(), "Ranked candidates");
    ranked
}

#[instrument(name = "Search by name", level = "debug", skip(registry, config), fields(kind = %T::KIND, scheme = %T::SCHEME))]
pub fn search_inner<'a, T: Division>(
    registry: &'a Registry<T>,
    query: &str,
    config: &SearchConfig,
) -> Vec<&'a T> {
    let mut results: Vec<&T> = rank_by_name(registry, query, TypeBonus::None)
        .into_iter()
        .map(|(_, division)| division)
        .collect();
    config.truncate(&mut results);
    results
}

/// Resolve a forward entry by code into current divisions, skipping dangling references.
fn from_legacy_code<'a, O, N, C>(
    table: &ConversionTable<O, N>,
    current: &'a Registry<C>,
    code: u32,
) -> Vec<FromLegacy<'a, C>>
where
    O: OldRef,
    N: ConversionRef,
    C: Division,
{
    let Some(entry) = table.forward(code) else {
        debug!(code, kind = %C::KIND, "No conversion entry for legacy code");
        return Vec::new();
    };
    entry
        .news
        .iter()
        .filter_map(|new_ref| match current.by_code(new_ref.code()) {
            Ok(division) => Some(FromLegacy {
                source_code: code,
                division,
            }),
            Err(e) => {
                warn!(error = %e, legacy_code = code, "Skipping dangling conversion reference");
                None
            }
        })
        .collect()
}

/// Score every legacy unit in table order, then keep the best-scored hit per current code.
fn from_legacy_name<'a, O, N, L, C>(
    table: &ConversionTable<O, N>,
    legacy: &Registry<L>,
    current: &'a Registry<C>,
    raw_query: &str,
) -> Vec<FromLegacy<'a, C>>
where
    O: OldRef,
    N: ConversionRef,
    L: Division,
    C: Division,
{
    let Some(query) = NormalizedQuery::parse(L::KIND, raw_query) else {
        debug!(query = raw_query, "Empty search query");
        return Vec::new();
    };
    let scorer = MatchScorer::new(L::KIND, TypeBonus::PreferUrban);

    let mut hits: Vec<(u32, FromLegacy<'a, C>)> = Vec::new();
    for entry in table.old_to_new() {
        let old_code = entry.old.code();
        let Some(old) = legacy.get(old_code) else {
            warn!(scheme = %L::SCHEME, kind = %L::KIND, code = old_code, "Conversion entry points to unknown legacy code");
            continue;
        };
        if !passes(&query, L::KIND, old.name()) {
            continue;
        }
        let Some(score) = scorer.score(raw_query, &query.text, old.name(), old.division_type())
        else {
            continue;
        };
        trace!(legacy = old.name(), score, "Legacy candidate matched");

        for new_ref in &entry.news {
            match current.by_code(new_ref.code()) {
                Ok(division) => hits.push((
                    score,
                    FromLegacy {
                        source_code: old_code,
                        division,
                    },
                )),
                Err(e) => {
                    warn!(error = %e, legacy_code = old_code, "Skipping dangling conversion reference");
                }
            }
        }
    }

    hits.sort_by_key(|(score, _)| *score);
    let mut seen: HashSet<u32> = HashSet::new();
    hits.into_iter()
        .filter(|(_, hit)| seen.insert(hit.division.code()))
        .map(|(_, hit)| hit)
        .collect()
}

#[instrument(name = "Search wards from legacy", level = "debug", skip_all)]
pub fn wards_from_legacy_inner<'a>(
    current: &'a CurrentRegistry,
    legacy: &LegacyRegistry,
    bridge: &ConversionBridge,
    query: LegacyQuery<'_>,
    config: &SearchConfig,
) -> Vec<FromLegacy<'a, Ward>> {
    if query.is_empty() {
        debug!(?query, "Empty legacy query");
        return Vec::new();
    }
    match query {
        LegacyQuery::Code(code) => from_legacy_code(bridge.wards(), current.wards(), code),
        LegacyQuery::Name(name) => {
            let mut results =
                from_legacy_name(bridge.wards(), legacy.wards(), current.wards(), name);
            config.truncate(&mut results);
            results
        }
    }
}

#[instrument(name = "Search provinces from legacy", level = "debug", skip_all)]
pub fn provinces_from_legacy_inner<'a>(
    current: &'a CurrentRegistry,
    legacy: &LegacyRegistry,
    bridge: &ConversionBridge,
    query: LegacyQuery<'_>,
    config: &SearchConfig,
) -> Vec<FromLegacy<'a, Province>> {
    if query.is_empty() {
        debug!(?query, "Empty legacy query");
        return Vec::new();
    }
    match query {
        LegacyQuery::Code(code) => from_legacy_code(bridge.provinces(), current.provinces(), code),
        LegacyQuery::Name(name) => {
            let mut results =
                from_legacy_name(bridge.provinces(), legacy.provinces(), current.provinces(), name);
            config.truncate(&mut results);
            results
        }
    }
}

fn resolve_districts(
    legacy: &LegacyRegistry,
    query: LegacyQuery<'_>,
    resolution: DistrictResolution,
) -> Vec<u32> {
    match query {
        LegacyQuery::Code(code) => vec![code],
        LegacyQuery::Name(name) => {
            let ranked = rank_by_name(legacy.districts(), name, TypeBonus::None);
            let Some(&(best, first)) = ranked.first() else {
                debug!(name, "No legacy district matches");
                return Vec::new();
            };
            let tied: Vec<u32> = ranked
                .iter()
                .take_while(|(score, _)| *score == best)
                .map(|(_, district)| district.code)
                .collect();
            match resolution {
                DistrictResolution::FirstMatch => {
                    if tied.len() > 1 {
                        debug!(name, ?tied, picked = first.code, "Legacy district name is ambiguous");
                    }
                    vec![first.code]
                }
                DistrictResolution::AllBestMatches => tied,
            }
        }
    }
}

/// Current wards reached from every legacy ward of a district, ascending by current code.
#[instrument(name = "Search wards from legacy district", level = "debug", skip_all)]
pub fn wards_from_legacy_district_inner<'a>(
    current: &'a CurrentRegistry,
    legacy: &LegacyRegistry,
    bridge: &ConversionBridge,
    query: LegacyQuery<'_>,
    config: &SearchConfig,
) -> Vec<FromLegacy<'a, Ward>> {
    if query.is_empty() {
        debug!(?query, "Empty legacy district query");
        return Vec::new();
    }
    let districts = resolve_districts(legacy, query, config.district_resolution);
    if districts.is_empty() {
        return Vec::new();
    }

    // current ward code -> first legacy ward seen in table order
    let mut reached: BTreeMap<u32, u32> = BTreeMap::new();
    for entry in bridge.wards().old_to_new() {
        if districts.contains(&entry.old.district_code) {
            for new_ref in &entry.news {
                reached.entry(new_ref.code).or_insert(entry.old.code);
            }
        }
    }
    if reached.is_empty() {
        debug!(?districts, "No current wards for legacy district");
    }

    reached
        .into_iter()
        .filter_map(|(new_code, old_code)| match current.wards().by_code(new_code) {
            Ok(division) => Some(FromLegacy {
                source_code: old_code,
                division,
            }),
            Err(e) => {
                warn!(error = %e, legacy_code = old_code, "Skipping dangling conversion reference");
                None
            }
        })
        .collect()
}

/// Legacy units behind a current code, in conversion-table order.
fn legacy_sources<'a, O, L>(olds: &[O], legacy: &'a Registry<L>) -> Vec<&'a L>
where
    O: OldRef,
    L: Division,
{
    olds.iter()
        .filter_map(|old_ref| match legacy.by_code(old_ref.code()) {
            Ok(division) => Some(division),
            Err(e) => {
                warn!(error = %e, "Skipping dangling conversion reference");
                None
            }
        })
        .collect()
}

pub fn ward_legacy_sources_inner<'a>(
    legacy: &'a LegacyRegistry,
    bridge: &ConversionBridge,
    current_code: u32,
) -> Vec<&'a legacy::Ward> {
    match bridge.backward_ward(current_code) {
        Ok(entry) => legacy_sources(&entry.olds, legacy.wards()),
        Err(e) => {
            debug!(error = %e, "No legacy sources");
            Vec::new()
        }
    }
}

pub fn province_legacy_sources_inner<'a>(
    legacy: &'a LegacyRegistry,
    bridge: &ConversionBridge,
    current_code: u32,
) -> Vec<&'a legacy::Province> {
    match bridge.backward_province(current_code) {
        Ok(entry) => legacy_sources(&entry.olds, legacy.provinces()),
        Err(e) => {
            debug!(error = %e, "No legacy sources");
            Vec::new()
        }
    }
}
