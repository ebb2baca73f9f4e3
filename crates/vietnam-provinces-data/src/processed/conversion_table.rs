use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap as HashMap;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::raw::ConversionRow;

/// Date the 2025 reorganisation took effect.
pub const EFFECTIVE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 7, 1) {
    Some(date) => date,
    None => panic!("invalid effective date"),
};

const SOURCE: &str = "BangChuyendoiĐVHCmoi_cu_khong_merge.csv";

/// Anything that sits in a conversion table and is keyed by its own code.
pub trait ConversionRef {
    fn code(&self) -> u32;
}

/// Legacy side of a conversion entry.
pub trait OldRef: ConversionRef {
    fn is_partly_merged(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OldWardRef {
    pub code: u32,
    pub district_code: u32,
    pub province_code: u32,
    pub is_partly_merged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NewWardRef {
    pub code: u32,
    pub province_code: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OldProvinceRef {
    pub code: u32,
    pub is_partly_merged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NewProvinceRef {
    pub code: u32,
}

macro_rules! impl_conversion_ref {
    ($($ty:ty),+) => {
        $(impl ConversionRef for $ty {
            fn code(&self) -> u32 {
                self.code
            }
        })+
    };
}

impl_conversion_ref!(OldWardRef, NewWardRef, OldProvinceRef, NewProvinceRef);

impl OldRef for OldWardRef {
    fn is_partly_merged(&self) -> bool {
        self.is_partly_merged
    }
}

impl OldRef for OldProvinceRef {
    fn is_partly_merged(&self) -> bool {
        self.is_partly_merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OldToNewEntry<O, N> {
    pub old: O,
    pub news: Vec<N>,
}

/// Olds carry the same `is_partly_merged` as in the forward entry of that old code, not the
/// flag of the individual row that linked them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewToOldEntry<O, N> {
    pub new: N,
    pub olds: Vec<O>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub old_count: usize,
    pub new_count: usize,
    pub partly_merged_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionMetadata {
    pub description: String,
    pub effective_date: NaiveDate,
    pub source: String,
    pub stats: ConversionStats,
}

/// Both directions of a legacy/current mapping, precomputed.
///
/// Entries are kept in construction order and indexed by code, so iteration is deterministic
/// and each direction is a single hash lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionTable<O, N> {
    metadata: ConversionMetadata,
    old_to_new: Vec<OldToNewEntry<O, N>>,
    new_to_old: Vec<NewToOldEntry<O, N>>,
    #[serde(skip)]
    old_index: HashMap<u32, usize>,
    #[serde(skip)]
    new_index: HashMap<u32, usize>,
}

pub type WardConversionTable = ConversionTable<OldWardRef, NewWardRef>;
pub type ProvinceConversionTable = ConversionTable<OldProvinceRef, NewProvinceRef>;

impl<O: OldRef, N: ConversionRef> ConversionTable<O, N> {
    fn from_entries(
        description: &str,
        old_to_new: Vec<OldToNewEntry<O, N>>,
        new_to_old: Vec<NewToOldEntry<O, N>>,
    ) -> Self {
        let old_index = old_to_new
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.old.code(), i))
            .collect();
        let new_index = new_to_old
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.new.code(), i))
            .collect();
        let stats = ConversionStats {
            old_count: old_to_new.len(),
            new_count: new_to_old.len(),
            partly_merged_count: old_to_new
                .iter()
                .filter(|entry| entry.old.is_partly_merged())
                .count(),
        };
        Self {
            metadata: ConversionMetadata {
                description: description.to_string(),
                effective_date: EFFECTIVE_DATE,
                source: SOURCE.to_string(),
                stats,
            },
            old_to_new,
            new_to_old,
            old_index,
            new_index,
        }
    }

    pub fn forward(&self, old_code: u32) -> Option<&OldToNewEntry<O, N>> {
        self.old_index.get(&old_code).map(|&i| &self.old_to_new[i])
    }

    pub fn backward(&self, new_code: u32) -> Option<&NewToOldEntry<O, N>> {
        self.new_index.get(&new_code).map(|&i| &self.new_to_old[i])
    }

    /// Legacy-keyed entries in table order.
    pub fn old_to_new(&self) -> &[OldToNewEntry<O, N>] {
        &self.old_to_new
    }

    /// Current-keyed entries in table order.
    pub fn new_to_old(&self) -> &[NewToOldEntry<O, N>] {
        &self.new_to_old
    }

    pub fn metadata(&self) -> &ConversionMetadata {
        &self.metadata
    }

    pub fn stats(&self) -> ConversionStats {
        self.metadata.stats
    }
}

/// Build the ward table from raw conversion rows.
///
/// Forward entries follow the first appearance of each legacy code; duplicate (old, new) pairs
/// collapse. A legacy ward is partly merged when it reaches more than one current ward or any
/// of its rows carries the partial flag. Backward entries reuse the forward legacy refs.
#[instrument(name = "Build ward conversion table", level = "debug", skip_all)]
pub fn build_ward_table(rows: &[ConversionRow]) -> WardConversionTable {
    let mut forward: Vec<OldToNewEntry<OldWardRef, NewWardRef>> = Vec::new();
    let mut forward_index: HashMap<u32, usize> = HashMap::new();

    for row in rows {
        let idx = *forward_index.entry(row.old_ward_code).or_insert_with(|| {
            forward.push(OldToNewEntry {
                old: OldWardRef {
                    code: row.old_ward_code,
                    district_code: row.old_district_code,
                    province_code: row.old_province_code,
                    is_partly_merged: false,
                },
                news: Vec::new(),
            });
            forward.len() - 1
        });
        let entry = &mut forward[idx];
        entry.old.is_partly_merged |= row.is_partly_merged;
        let new_ref = NewWardRef {
            code: row.new_ward_code,
            province_code: row.new_province_code,
        };
        if !entry.news.contains(&new_ref) {
            entry.news.push(new_ref);
        }
    }
    for entry in &mut forward {
        if entry.news.len() > 1 {
            entry.old.is_partly_merged = true;
        }
    }

    let mut backward: Vec<NewToOldEntry<OldWardRef, NewWardRef>> = Vec::new();
    let mut backward_index: HashMap<u32, usize> = HashMap::new();
    for row in rows {
        let Some(&old_idx) = forward_index.get(&row.old_ward_code) else {
            continue;
        };
        let old_ref = forward[old_idx].old;
        let idx = *backward_index.entry(row.new_ward_code).or_insert_with(|| {
            backward.push(NewToOldEntry {
                new: NewWardRef {
                    code: row.new_ward_code,
                    province_code: row.new_province_code,
                },
                olds: Vec::new(),
            });
            backward.len() - 1
        });
        let entry = &mut backward[idx];
        if !entry.olds.iter().any(|o| o.code == old_ref.code) {
            entry.olds.push(old_ref);
        }
    }

    let table = ConversionTable::from_entries(
        "Ward conversion table for administrative changes effective 01/07/2025",
        forward,
        backward,
    );
    debug!(stats = ?table.stats(), "Ward conversion table built");
    table
}

/// Province table derived from the ward rows; both directions sorted by code.
#[instrument(name = "Build province conversion table", level = "debug", skip_all)]
pub fn build_province_table(rows: &[ConversionRow]) -> ProvinceConversionTable {
    let mut old_to_new: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    let mut new_to_old: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    for row in rows {
        old_to_new
            .entry(row.old_province_code)
            .or_default()
            .insert(row.new_province_code);
        new_to_old
            .entry(row.new_province_code)
            .or_default()
            .insert(row.old_province_code);
    }

    let old_ref = |code: u32| OldProvinceRef {
        code,
        is_partly_merged: old_to_new.get(&code).is_some_and(|news| news.len() > 1),
    };

    let forward = old_to_new
        .iter()
        .map(|(&code, news)| OldToNewEntry {
            old: old_ref(code),
            news: news.iter().map(|&code| NewProvinceRef { code }).collect(),
        })
        .collect();
    let backward = new_to_old
        .iter()
        .map(|(&code, olds)| NewToOldEntry {
            new: NewProvinceRef { code },
            olds: olds.iter().map(|&code| old_ref(code)).collect(),
        })
        .collect();

    let table = ConversionTable::from_entries(
        "Province conversion table for administrative changes effective 01/07/2025",
        forward,
        backward,
    );
    info!(
        legacy_provinces = table.stats().old_count,
        current_provinces = table.stats().new_count,
        "Province conversion table built"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(old: u32, district: u32, province: u32, new: u32, new_province: u32) -> ConversionRow {
        ConversionRow {
            old_ward_code: old,
            old_ward_name: format!("Phường {old}"),
            old_district_code: district,
            old_province_code: province,
            new_ward_code: new,
            new_ward_name: format!("Phường {new}"),
            new_province_code: new_province,
            is_partly_merged: false,
        }
    }

    #[test]
    fn test_many_to_one() {
        let rows = vec![
            row(22741, 582, 58, 22750, 56),
            row(22744, 582, 58, 22750, 56),
            row(22747, 582, 58, 22750, 56),
        ];
        let table = build_ward_table(&rows);

        let back = table.backward(22750).unwrap();
        let olds: Vec<u32> = back.olds.iter().map(|o| o.code).collect();
        assert_eq!(olds, vec![22741, 22744, 22747]);
        for old in [22741, 22744, 22747] {
            let entry = table.forward(old).unwrap();
            assert_eq!(entry.news, vec![NewWardRef { code: 22750, province_code: 56 }]);
            assert!(!entry.old.is_partly_merged);
        }
    }

    #[test]
    fn test_split_marks_partly_merged() {
        let rows = vec![row(22768, 582, 58, 22759, 56), row(22768, 582, 58, 22770, 56)];
        let table = build_ward_table(&rows);

        let entry = table.forward(22768).unwrap();
        assert!(entry.old.is_partly_merged);
        assert_eq!(entry.news.len(), 2);
        // Backward refs carry the same flag.
        assert!(table.backward(22770).unwrap().olds[0].is_partly_merged);
        assert_eq!(table.stats().partly_merged_count, 1);
    }

    #[test]
    fn test_note_flag_alone_marks_partly_merged() {
        let mut flagged = row(26707, 754, 77, 26722, 79);
        flagged.is_partly_merged = true;
        let table = build_ward_table(&[flagged]);
        assert!(table.forward(26707).unwrap().old.is_partly_merged);
    }

    #[test]
    fn test_backward_olds_share_forward_flag() {
        let mut flagged = row(26707, 754, 77, 26722, 79);
        flagged.is_partly_merged = true;
        let plain = row(26707, 754, 77, 26725, 79);
        let table = build_ward_table(&[flagged, plain]);

        // The unflagged row still reports the old ward as partly merged.
        let back = table.backward(26725).unwrap();
        assert_eq!(back.olds.len(), 1);
        assert!(back.olds[0].is_partly_merged);
        assert_eq!(back.olds[0], table.forward(26707).unwrap().old);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let rows = vec![row(688, 24, 2, 691, 8), row(688, 24, 2, 691, 8)];
        let table = build_ward_table(&rows);
        let entry = table.forward(688).unwrap();
        assert_eq!(entry.news.len(), 1);
        assert!(!entry.old.is_partly_merged);
        assert_eq!(table.backward(691).unwrap().olds.len(), 1);
    }

    #[test]
    fn test_forward_keeps_first_appearance_order() {
        let rows = vec![
            row(300, 3, 1, 10, 1),
            row(100, 1, 1, 10, 1),
            row(200, 2, 1, 11, 1),
        ];
        let table = build_ward_table(&rows);
        let order: Vec<u32> = table.old_to_new().iter().map(|e| e.old.code).collect();
        assert_eq!(order, vec![300, 100, 200]);
        assert!(table.forward(999).is_none());
        assert!(table.backward(999).is_none());
    }

    #[test]
    fn test_province_table() {
        let rows = vec![
            row(26707, 754, 77, 26722, 79),
            row(27094, 778, 79, 27088, 79),
            row(22741, 582, 58, 22750, 56),
            row(22420, 572, 56, 22423, 56),
        ];
        let table = build_province_table(&rows);

        let olds: Vec<u32> = table.backward(79).unwrap().olds.iter().map(|o| o.code).collect();
        assert_eq!(olds, vec![77, 79]);
        let order: Vec<u32> = table.old_to_new().iter().map(|e| e.old.code).collect();
        assert_eq!(order, vec![56, 58, 77, 79]);
        assert!(!table.forward(58).unwrap().old.is_partly_merged);
        assert_eq!(table.metadata().effective_date, EFFECTIVE_DATE);
    }

    #[test]
    fn test_province_split_is_partly_merged() {
        let rows = vec![row(1, 10, 5, 100, 7), row(2, 10, 5, 200, 8)];
        let table = build_province_table(&rows);
        assert!(table.forward(5).unwrap().old.is_partly_merged);
        assert_eq!(table.stats().partly_merged_count, 1);
    }

    #[test]
    fn test_metadata_serializes() {
        let table = build_ward_table(&[row(688, 24, 2, 691, 8)]);
        let json = serde_json::to_value(table.metadata()).unwrap();
        assert_eq!(json["effective_date"], "2025-07-01");
        assert_eq!(json["stats"]["old_count"], 1);
    }
}
