use vietnam_provinces_data::{DivisionKind, DivisionType};

use super::normalize::{normalize_for, prefix, prefix_any_case, prefix_ascii};

/// Whether candidate division types shift the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeBonus {
    #[default]
    None,
    /// Town before ward before commune; centrally governed city before province.
    PreferUrban,
}

/// Ranks one candidate name against a query. Lower is better.
///
/// | rung | condition                                           | score              |
/// |------|-----------------------------------------------------|--------------------|
/// | 1    | query equals the unprefixed name                    | `0 + bonus`        |
/// | 2    | same, ignoring case                                 | `1 + bonus`        |
/// | 3    | normalized query equals the normalized name         | `2 + bonus`        |
/// | 4    | normalized query starts the normalized name         | `10 + bonus`       |
/// | 4    | normalized query found at char offset `p > 0`       | `100 + p + bonus`  |
///
/// A query that itself starts with a type prefix is compared with the full name first and
/// scores a flat 0 or 1 on a hit.
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer {
    kind: DivisionKind,
    bonus: TypeBonus,
}

impl MatchScorer {
    pub fn new(kind: DivisionKind, bonus: TypeBonus) -> Self {
        Self { kind, bonus }
    }

    fn bonus_for(&self, candidate_type: DivisionType) -> u32 {
        match self.bonus {
            TypeBonus::None => 0,
            TypeBonus::PreferUrban => candidate_type.urban_bonus(),
        }
    }

    /// `None` when the normalized query is not contained in the normalized candidate;
    /// such candidates are not ranked at all.
    pub fn score(
        &self,
        raw_query: &str,
        normalized_query: &str,
        candidate_name: &str,
        candidate_type: DivisionType,
    ) -> Option<u32> {
        let normalized_candidate = normalize_for(self.kind, candidate_name);
        let byte_pos = normalized_candidate.find(normalized_query)?;
        let bonus = self.bonus_for(candidate_type);

        let query_lower = raw_query.to_lowercase();
        let candidate_lower = candidate_name.to_lowercase();
        if prefix(self.kind).is_match(query_lower.trim_start()) {
            if raw_query == candidate_name {
                return Some(0);
            }
            if query_lower == candidate_lower {
                return Some(1);
            }
        } else {
            if raw_query == prefix_any_case(self.kind).replace(candidate_name, "") {
                return Some(bonus);
            }
            if query_lower == prefix(self.kind).replace(&candidate_lower, "") {
                return Some(1 + bonus);
            }
        }

        if normalized_query == prefix_ascii(self.kind).replace(&normalized_candidate, "") {
            return Some(2 + bonus);
        }

        let pos = normalized_candidate[..byte_pos].chars().count() as u32;
        Some(if pos == 0 { 10 + bonus } else { 100 + pos + bonus })
    }
}
