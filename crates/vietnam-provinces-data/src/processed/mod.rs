//! Structures derived once from the raw records.
pub mod conversion_table;

pub use conversion_table::{
    ConversionMetadata, ConversionRef, ConversionStats, ConversionTable, EFFECTIVE_DATE,
    NewProvinceRef, NewToOldEntry, NewWardRef, OldProvinceRef, OldRef, OldToNewEntry,
    OldWardRef, ProvinceConversionTable, WardConversionTable, build_province_table,
    build_ward_table,
};
