use anyhow::Result;
use itertools::Itertools;
use tracing::{Level, debug, info, info_span};
use vietnam_provinces::{
    DistrictResolution, DivisionSearcher, SearchConfig, data::test_data::sample_dataset,
};

fn main() -> Result<()> {
    vietnam_provinces::init_logging(Level::DEBUG)?;

    let t_setup = std::time::Instant::now();
    let config = SearchConfig::builder()
        .district_resolution(DistrictResolution::AllBestMatches)
        .build();
    let searcher = DivisionSearcher::from_dataset_with_config(&sample_dataset(), config)?;
    debug!(
        elapsed_seconds = t_setup.elapsed().as_secs_f32(),
        "DivisionSearcher setup complete"
    );

    let _span = info_span!("legacy_conversion_example").entered();

    // A legacy ward code, including one split between two current wards.
    for code in [26707, 22768] {
        let wards = searcher.search_wards_from_legacy(code);
        info!(
            legacy_code = code,
            current = %wards.iter().map(|w| &w.name).join(", "),
            "Legacy ward code"
        );
    }

    // A legacy ward name; towns rank before wards, wards before communes.
    for hit in searcher.search_wards_from_legacy_with_source("phú mỹ") {
        info!(
            current = %hit.division.name,
            source_code = hit.source_code,
            "Legacy ward name"
        );
    }

    // Every current ward that took in part of a dissolved district.
    for hit in searcher.search_wards_from_legacy_district_with_source("Phan Rang-Tháp Chàm") {
        info!(
            current = %hit.division.name,
            source_code = hit.source_code,
            "Legacy district"
        );
    }

    // And back again.
    for code in [22750, 26722] {
        let sources = searcher.ward_legacy_sources(code);
        info!(
            current_code = code,
            legacy = %sources.iter().map(|w| &w.name).join(", "),
            "Legacy sources"
        );
    }

    let provinces = searcher.province_legacy_sources(56);
    info!(
        legacy = %provinces.iter().map(|p| &p.name).join(", "),
        "Merged into Khánh Hòa"
    );

    Ok(())
}
