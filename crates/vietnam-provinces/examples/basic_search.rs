use anyhow::Result;
use tracing::{Level, info, info_span, warn};
use vietnam_provinces::{DivisionSearcher, data::test_data::sample_dataset};

fn main() -> Result<()> {
    vietnam_provinces::init_logging(Level::INFO)?;

    // Falls back to the bundled sample when no dataset is installed.
    let searcher = match std::env::args().nth(1) {
        Some(path) => DivisionSearcher::load(path)?,
        None => DivisionSearcher::initialize().or_else(|e| {
            warn!(error = %e, "No dataset found, using the sample dataset");
            DivisionSearcher::from_dataset(&sample_dataset())
        })?,
    };

    let _span = info_span!("basic_search_example").entered();

    for query in ["Khánh Hòa", "ho chi minh", "Thành phố Hồ Chí Minh"] {
        for province in searcher.search_provinces(query) {
            info!(query, code = province.code, name = %province.name, "Current province");
        }
    }

    for query in ["Phú Mỹ", "tan hai", "Phường Đông Hải"] {
        for ward in searcher.search_wards(query) {
            info!(
                query,
                code = ward.code,
                name = %ward.name,
                province = ward.province_code,
                "Current ward"
            );
        }
    }

    for query in ["Phan Rang", "quan 7"] {
        for district in searcher.search_legacy_districts(query) {
            info!(query, code = district.code, name = %district.name, "Legacy district");
        }
    }

    match searcher.ward(99999) {
        Ok(ward) => info!(name = %ward.name, "Unexpected ward"),
        Err(e) => info!(error = %e, "Lookup of an unknown code fails"),
    }

    Ok(())
}
