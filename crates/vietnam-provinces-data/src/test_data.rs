//! A small synthetic dataset shaped like the real one.
//!
//! It covers the cases the resolver has to get right: a dissolved district whose wards spread
//! over several current wards, a legacy ward split in two, several legacy wards merged into one,
//! name collisions across division types, names that start with a type word ("Thanh Hóa",
//! "Thanh Xuân"), and a current unit with no legacy source.
use tracing::debug;

use crate::raw::{
    ConversionRow, CurrentDivisions, DistrictRecord, DivisionDataset, LegacyDivisions,
    ProvinceRecord, WardRecord,
};

const LEGACY_PROVINCES: &[(u32, &str)] = &[
    (1, "Thành phố Hà Nội"),
    (2, "Tỉnh Hà Giang"),
    (8, "Tỉnh Tuyên Quang"),
    (17, "Tỉnh Hòa Bình"),
    (38, "Tỉnh Thanh Hóa"),
    (56, "Tỉnh Khánh Hòa"),
    (58, "Tỉnh Ninh Thuận"),
    (77, "Tỉnh Bà Rịa - Vũng Tàu"),
    (79, "Thành phố Hồ Chí Minh"),
];

const LEGACY_DISTRICTS: &[(u32, &str, u32)] = &[
    (3, "Quận Tây Hồ", 1),
    (9, "Quận Thanh Xuân", 1),
    (16, "Huyện Sóc Sơn", 1),
    (24, "Thành phố Hà Giang", 2),
    (70, "Thành phố Tuyên Quang", 8),
    (148, "Thành phố Hòa Bình", 17),
    (380, "Thành phố Thanh Hóa", 38),
    (572, "Thị xã Ninh Hòa", 56),
    (582, "Thành phố Phan Rang-Tháp Chàm", 58),
    (588, "Huyện Ninh Hải", 58),
    (754, "Huyện Tân Thành", 77),
    (778, "Quận 7", 79),
];

const LEGACY_WARDS: &[(u32, &str, u32)] = &[
    (103, "Phường Xuân La", 3),
    (337, "Phường Nhân Chính", 9),
    (367, "Phường Thanh Xuân Trung", 9),
    (688, "Phường Quang Trung", 24),
    (2200, "Phường Phan Thiết", 70),
    (4606, "Phường Đồng Tiến", 148),
    (8980, "Xã Thanh Xuân", 16),
    (14758, "Phường Điện Biên", 380),
    (22420, "Xã Phú Mỹ", 572),
    (22732, "Phường Đô Vinh", 582),
    (22735, "Phường Bảo An", 582),
    (22738, "Phường Phước Mỹ", 582),
    (22741, "Phường Thanh Sơn", 582),
    (22744, "Phường Kinh Dinh", 582),
    (22747, "Phường Phủ Hà", 582),
    (22768, "Phường Đông Hải", 582),
    (22771, "Phường Mỹ Đông", 582),
    (22774, "Phường Văn Hải", 582),
    (22789, "Thị trấn Khánh Hải", 588),
    (26707, "Phường Tân Hòa", 754),
    (26710, "Xã Tân Hải", 754),
    (26713, "Thị trấn Phú Mỹ", 754),
    (27094, "Phường Phú Mỹ", 778),
];

const CURRENT_PROVINCES: &[(u32, &str, u16)] = &[
    (1, "Thành phố Hà Nội", 24),
    (8, "Tỉnh Tuyên Quang", 207),
    (25, "Tỉnh Phú Thọ", 210),
    (38, "Tỉnh Thanh Hóa", 237),
    (56, "Tỉnh Khánh Hòa", 258),
    (79, "Thành phố Hồ Chí Minh", 28),
];

const CURRENT_WARDS: &[(u32, &str, u32)] = &[
    (91, "Phường Tây Hồ", 1),
    (367, "Phường Thanh Xuân", 1),
    (691, "Phường Hà Giang 1", 8),
    (2212, "Phường Minh Xuân", 8),
    (4621, "Phường Hòa Bình", 25),
    (8995, "Xã Sóc Sơn", 1),
    (14767, "Phường Hạc Thành", 38),
    (22423, "Phường Ninh Hòa", 56),
    (22738, "Phường Đô Vinh", 56),
    (22741, "Phường Bảo An", 56),
    (22750, "Phường Phan Rang", 56),
    (22759, "Phường Đông Hải", 56),
    (22763, "Phường Văn Hải", 56),
    (22770, "Phường Ninh Chử", 56),
    (26722, "Phường Tân Hải", 79),
    (26725, "Phường Phú Mỹ", 79),
    (26944, "Đặc khu Côn Đảo", 79),
    (27088, "Phường Tân Mỹ", 79),
];

/// (legacy ward, current ward, partial transfer)
const CONVERSIONS: &[(u32, u32, bool)] = &[
    (103, 91, false),
    (337, 367, false),
    (367, 367, false),
    (688, 691, false),
    (2200, 2212, false),
    (4606, 4621, false),
    (8980, 8995, false),
    (14758, 14767, false),
    (22420, 22423, false),
    (22732, 22738, false),
    (22735, 22741, false),
    (22738, 22741, false),
    (22741, 22750, false),
    (22744, 22750, false),
    (22747, 22750, false),
    (22768, 22759, true),
    (22768, 22770, true),
    (22771, 22759, false),
    (22774, 22763, false),
    (22789, 22770, false),
    (26707, 26722, false),
    (26710, 26722, false),
    (26713, 26725, false),
    (27094, 27088, false),
];

fn province(code: u32, name: &str, phone_code: Option<u16>) -> ProvinceRecord {
    ProvinceRecord {
        code,
        name: name.to_string(),
        codename: None,
        phone_code,
    }
}

fn ward(code: u32, name: &str, parent_code: u32) -> WardRecord {
    WardRecord {
        code,
        name: name.to_string(),
        codename: None,
        parent_code,
    }
}

fn lookup<'a>(table: &'a [(u32, &'a str, u32)], code: u32) -> Option<(&'a str, u32)> {
    table
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, name, parent)| (name, parent))
}

fn conversion_rows() -> Vec<ConversionRow> {
    CONVERSIONS
        .iter()
        .filter_map(|&(old, new, partial)| {
            let (old_name, district) = lookup(LEGACY_WARDS, old)?;
            let (_, old_province) = lookup(LEGACY_DISTRICTS, district)?;
            let (new_name, new_province) = lookup(CURRENT_WARDS, new)?;
            Some(ConversionRow {
                old_ward_code: old,
                old_ward_name: old_name.to_string(),
                old_district_code: district,
                old_province_code: old_province,
                new_ward_code: new,
                new_ward_name: new_name.to_string(),
                new_province_code: new_province,
                is_partly_merged: partial,
            })
        })
        .collect()
}

/// Build the sample dataset.
pub fn sample_dataset() -> DivisionDataset {
    let dataset = DivisionDataset {
        current: CurrentDivisions {
            provinces: CURRENT_PROVINCES
                .iter()
                .map(|&(code, name, phone)| province(code, name, Some(phone)))
                .collect(),
            wards: CURRENT_WARDS
                .iter()
                .map(|&(code, name, parent)| ward(code, name, parent))
                .collect(),
        },
        legacy: LegacyDivisions {
            provinces: LEGACY_PROVINCES
                .iter()
                .map(|&(code, name)| province(code, name, None))
                .collect(),
            districts: LEGACY_DISTRICTS
                .iter()
                .map(|&(code, name, province_code)| DistrictRecord {
                    code,
                    name: name.to_string(),
                    codename: None,
                    province_code,
                })
                .collect(),
            wards: LEGACY_WARDS
                .iter()
                .map(|&(code, name, parent)| ward(code, name, parent))
                .collect(),
        },
        ward_conversion: conversion_rows(),
    };
    debug!(
        rows = dataset.ward_conversion.len(),
        "Built sample division dataset"
    );
    dataset
}
