//! Integration tests for the division resolver
//!
//! These run against the public API only, using the bundled sample dataset.

use proptest::prelude::*;
use vietnam_provinces::{
    DistrictResolution, Division, DivisionSearcher, LegacyQuery, SearchConfig,
    SearchConfigBuilder,
    data::{ConversionRow, DivisionDataset, test_data::sample_dataset},
    error::ProvincesError,
    registry::RegistryError,
};

fn setup_test_env() {
    let _ = vietnam_provinces::init_logging(tracing::Level::WARN);
}

fn searcher() -> DivisionSearcher {
    setup_test_env();
    DivisionSearcher::from_dataset(&sample_dataset()).expect("Should build from sample data")
}

fn codes<T: Division>(items: &[&T]) -> Vec<u32> {
    items.iter().map(|item| item.code()).collect()
}

fn row(
    old: (u32, &str, u32, u32),
    new: (u32, &str, u32),
    is_partly_merged: bool,
) -> ConversionRow {
    ConversionRow {
        old_ward_code: old.0,
        old_ward_name: old.1.to_string(),
        old_district_code: old.2,
        old_province_code: old.3,
        new_ward_code: new.0,
        new_ward_name: new.1.to_string(),
        new_province_code: new.2,
        is_partly_merged,
    }
}

#[test]
fn test_dissolved_district_by_code_and_name() {
    let searcher = searcher();

    let by_code = searcher.search_wards_from_legacy_district_with_source(582);
    let pairs: Vec<(u32, u32)> = by_code
        .iter()
        .map(|hit| (hit.division.code, hit.source_code))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (22738, 22732),
            (22741, 22735),
            (22750, 22741),
            (22759, 22768),
            (22763, 22774),
            (22770, 22768),
        ]
    );

    for name in [
        "Phan Rang-Tháp Chàm",
        "Thành phố Phan Rang-Tháp Chàm",
        "phan rang-thap cham",
    ] {
        let by_name = searcher.search_wards_from_legacy_district(name);
        assert_eq!(
            codes(&by_name),
            vec![22738, 22741, 22750, 22759, 22763, 22770],
            "District query '{name}'"
        );
    }
}

#[test]
fn test_split_legacy_ward() {
    let searcher = searcher();

    let wards = searcher.search_wards_from_legacy(22768);
    assert_eq!(codes(&wards), vec![22759, 22770]);

    let entry = searcher.bridge().forward_ward(22768).unwrap();
    assert!(entry.old.is_partly_merged);
    assert!(!searcher.bridge().forward_ward(26707).unwrap().old.is_partly_merged);
}

#[test]
fn test_single_legacy_ward_code() {
    let searcher = searcher();
    let hits = searcher.search_wards_from_legacy_with_source(LegacyQuery::Code(26707));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].division.code, 26722);
    assert_eq!(hits[0].division.name, "Phường Tân Hải");
    assert_eq!(hits[0].source_code, 26707);
}

#[test]
fn test_whole_word_guard() {
    let searcher = searcher();

    let legacy = searcher.search_legacy_wards("Phú Mỹ");
    assert!(!codes(&legacy).contains(&22738), "Phước Mỹ must not match Phú Mỹ");

    let current = searcher.search_wards_from_legacy("Phú Mỹ");
    assert!(
        !codes(&current).contains(&22741),
        "Phước Mỹ's current ward must not be reached"
    );
}

#[test]
fn test_from_legacy_name_ranking_and_dedup() {
    let searcher = searcher();

    // Town (bonus 0) before ward (3) before commune (6); Đông Hải's two targets collapse to
    // their best hit, and 22770 is reached first through the town of Khánh Hải.
    let hits = searcher.search_wards_from_legacy_with_source("hải");
    let pairs: Vec<(u32, u32)> = hits
        .iter()
        .map(|hit| (hit.division.code, hit.source_code))
        .collect();
    assert_eq!(
        pairs,
        vec![(22770, 22789), (22763, 22774), (22759, 22768), (26722, 26710)]
    );
}

#[test]
fn test_prefixed_query_prefers_exact_type() {
    let searcher = searcher();
    let wards = searcher.search_wards_from_legacy("phường phú mỹ");
    assert_eq!(wards[0].code, 27088);

    let wards = searcher.search_wards_from_legacy("Xã Phú Mỹ");
    assert_eq!(wards[0].code, 22423);
}

#[test]
fn test_names_starting_with_type_word_provinces() {
    let searcher = searcher();

    for query in ["thanh hoa", "Thanh Hóa", "Tỉnh Thanh Hóa"] {
        assert_eq!(
            codes(&searcher.search_provinces(query)),
            vec![38],
            "Province query '{query}'"
        );
        assert_eq!(codes(&searcher.search_legacy_provinces(query)), vec![38]);
    }

    // Hòa Bình (now in Phú Thọ) shares the word "hoa" but not the name.
    let hits = searcher.search_provinces_from_legacy_with_source("thanh hoa");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].division.code, 38);
    assert_eq!(hits[0].source_code, 38);
}

#[test]
fn test_names_starting_with_type_word_districts() {
    let searcher = searcher();

    assert_eq!(codes(&searcher.search_legacy_districts("thanh xuan")), vec![9]);
    assert_eq!(codes(&searcher.search_legacy_districts("Quận Thanh Xuân")), vec![9]);
    assert_eq!(codes(&searcher.search_legacy_districts("thanh hoa")), vec![380]);

    // Xuân La sits in Tây Hồ and must not pull in Phường Tây Hồ.
    let hits = searcher.search_wards_from_legacy_district_with_source("thanh xuan");
    let pairs: Vec<(u32, u32)> = hits
        .iter()
        .map(|hit| (hit.division.code, hit.source_code))
        .collect();
    assert_eq!(pairs, vec![(367, 337)]);
}

#[test]
fn test_names_starting_with_type_word_wards() {
    let searcher = searcher();

    // Exact name first, then the longer "Thanh Xuân Trung"; "Xuân La" and "Minh Xuân" are out.
    assert_eq!(
        codes(&searcher.search_legacy_wards("Thanh Xuân")),
        vec![8980, 367]
    );
    assert_eq!(
        codes(&searcher.search_legacy_wards("thanh xuan")),
        vec![8980, 367]
    );
    assert_eq!(codes(&searcher.search_wards("thanh xuan")), vec![367]);

    let hits = searcher.search_wards_from_legacy_with_source("Thanh Xuân");
    let pairs: Vec<(u32, u32)> = hits
        .iter()
        .map(|hit| (hit.division.code, hit.source_code))
        .collect();
    assert_eq!(pairs, vec![(8995, 8980), (367, 367)]);
}

#[test]
fn test_search_is_deterministic() {
    let searcher = searcher();
    for query in ["hải", "phú mỹ", "phuong", "tan"] {
        let first = codes(&searcher.search_wards_from_legacy(query));
        for _ in 0..5 {
            assert_eq!(codes(&searcher.search_wards_from_legacy(query)), first);
        }
        let first = codes(&searcher.search_legacy_wards(query));
        assert_eq!(codes(&searcher.search_legacy_wards(query)), first);
    }
}

#[test]
fn test_empty_queries_return_nothing() {
    let searcher = searcher();

    assert!(searcher.search_wards("").is_empty());
    assert!(searcher.search_provinces("   ").is_empty());
    assert!(searcher.search_legacy_districts("Huyện").is_empty());
    assert!(searcher.search_wards_from_legacy("").is_empty());
    assert!(searcher.search_wards_from_legacy(LegacyQuery::Code(0)).is_empty());
    assert!(searcher.search_wards_from_legacy(99999).is_empty());
    assert!(searcher.search_provinces_from_legacy(0).is_empty());
    assert!(searcher.search_wards_from_legacy_district("").is_empty());
    assert!(searcher.search_wards_from_legacy_district(99999).is_empty());
    assert!(searcher.search_wards_from_legacy_district("Không Tồn Tại").is_empty());
    assert!(searcher.ward_legacy_sources(99999).is_empty());
    assert!(searcher.province_legacy_sources(0).is_empty());
}

#[test]
fn test_provinces_across_schemes() {
    let searcher = searcher();

    let hits = searcher.search_provinces_from_legacy_with_source("Bà Rịa");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].division.code, 79);
    assert_eq!(hits[0].source_code, 77);

    assert_eq!(codes(&searcher.search_provinces_from_legacy("Ninh")), vec![56]);
    assert_eq!(codes(&searcher.province_legacy_sources(56)), vec![56, 58]);
    assert_eq!(codes(&searcher.province_legacy_sources(8)), vec![2, 8]);

    let province = searcher.province(79).unwrap();
    assert_eq!(province.phone_code, Some(28));
}

#[test]
fn test_current_ward_without_legacy_source() {
    let searcher = searcher();
    assert_eq!(searcher.ward(26944).unwrap().name, "Đặc khu Côn Đảo");
    assert!(searcher.ward_legacy_sources(26944).is_empty());
    assert_eq!(codes(&searcher.search_wards("con dao")), vec![26944]);
}

#[test]
fn test_conversion_round_trip() {
    let searcher = searcher();

    for legacy_ward in searcher.legacy().wards() {
        for current in searcher.search_wards_from_legacy(legacy_ward.code) {
            let sources = searcher.ward_legacy_sources(current.code);
            assert!(
                codes(&sources).contains(&legacy_ward.code),
                "{} should list {} as a source",
                current.name,
                legacy_ward.name
            );
        }
    }

    for current in searcher.current().wards() {
        for source in searcher.ward_legacy_sources(current.code) {
            let reached = searcher.search_wards_from_legacy(source.code);
            assert!(codes(&reached).contains(&current.code));
        }
    }
}

#[test]
fn test_dangling_references_are_skipped() {
    setup_test_env();

    let mut dataset = sample_dataset();
    // Khánh Hải also points at a current ward that does not exist.
    dataset.ward_conversion.push(row(
        (22789, "Thị trấn Khánh Hải", 588, 58),
        (99990, "Phường Ma", 56),
        false,
    ));
    // An unknown legacy ward feeds Phú Mỹ.
    dataset.ward_conversion.push(row(
        (30001, "Xã Ma", 754, 77),
        (26725, "Phường Phú Mỹ", 79),
        false,
    ));
    let searcher = DivisionSearcher::from_dataset(&dataset).unwrap();

    assert_eq!(codes(&searcher.search_wards_from_legacy(22789)), vec![22770]);
    assert_eq!(codes(&searcher.ward_legacy_sources(26725)), vec![26713]);
    assert_eq!(
        codes(&searcher.search_wards_from_legacy_district(588)),
        vec![22770]
    );
    assert_eq!(
        codes(&searcher.search_wards_from_legacy("phú mỹ")),
        vec![26725, 27088, 22423]
    );
}

#[test]
fn test_limit_and_district_resolution() {
    let searcher = searcher();

    let limited = searcher
        .clone()
        .with_config(SearchConfigBuilder::top(2).build());
    assert_eq!(limited.search_wards_from_legacy("hải").len(), 2);
    assert_eq!(limited.search_wards_from_legacy(22768).len(), 2);

    let exhaustive = searcher.with_config(SearchConfigBuilder::exhaustive().build());
    assert_eq!(
        exhaustive.config().district_resolution,
        DistrictResolution::AllBestMatches
    );
    assert_eq!(
        codes(&exhaustive.search_wards_from_legacy_district("ninh")),
        vec![22423, 22770]
    );
}

#[test]
fn test_lookup_errors() {
    let searcher = searcher();

    let err = searcher.legacy_ward(99999).unwrap_err();
    assert_eq!(err.to_string(), "Registry error: Legacy ward code 99999 is invalid.");
    assert!(matches!(
        searcher.province(1),
        Err(ProvincesError::Registry(RegistryError::NotFound { code: 1, .. }))
    ));
    assert!(searcher.legacy_district(582).is_ok());
    assert!(searcher.legacy_province(77).is_ok());
}

#[test]
fn test_load_round_trips_through_json() {
    setup_test_env();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("divisions.json");
    std::fs::write(&path, sample_dataset().to_json().unwrap()).unwrap();

    let loaded = DivisionDataset::from_path(&path).unwrap();
    assert_eq!(loaded, sample_dataset());

    let searcher = DivisionSearcher::load(&path).unwrap();
    assert_eq!(searcher.search_wards_from_legacy_district(582).len(), 6);
}

#[test]
fn test_searcher_is_shareable() {
    let searcher = searcher();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let searcher = searcher.clone();
            std::thread::spawn(move || codes(&searcher.search_wards_from_legacy("phú mỹ")))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![26725, 27088, 22423]);
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_serialize_from_legacy() {
    let searcher = searcher();
    let hits = searcher.search_wards_from_legacy_with_source(26707);
    let json = serde_json::to_value(&hits).unwrap();
    assert_eq!(json[0]["source_code"], 26707);
    assert_eq!(json[0]["division"]["name"], "Phường Tân Hải");
}

proptest! {
    #[test]
    fn prop_searches_never_panic_and_respect_limit(query in "\\PC{0,16}", limit in 1usize..4) {
        let searcher = DivisionSearcher::from_dataset(&sample_dataset())
            .unwrap()
            .with_config(SearchConfig::builder().limit(limit).build());
        prop_assert!(searcher.search_wards(&query).len() <= limit);
        prop_assert!(searcher.search_legacy_wards(&query).len() <= limit);
        prop_assert!(searcher.search_wards_from_legacy(query.as_str()).len() <= limit);
        let _ = searcher.search_wards_from_legacy_district(query.as_str());
    }
}
