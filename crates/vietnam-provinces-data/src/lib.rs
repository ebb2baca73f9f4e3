//! Data layer for the `vietnam-provinces` resolver.
//!
//! Holds everything that is a property of the validated input rather than of search:
//! raw division records, the closed [`DivisionType`] tag set, name cleaning and codename
//! derivation, and the legacy/current conversion tables built from raw conversion rows.
use once_cell::sync::Lazy;
use std::path::PathBuf;

pub mod division_type;
pub mod names;
pub mod processed;
pub mod raw;
pub mod test_data;

pub const DATA_DIR_DEFAULT: &str = "./vn_provinces_data";
pub const DATASET_FILE_NAME: &str = "divisions.json";

/// Global data directory, overridable with `VN_PROVINCES_DATA_DIR`.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let dir =
        std::env::var("VN_PROVINCES_DATA_DIR").unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string());
    PathBuf::from(dir)
});

/// Path of the dataset file inside [`DATA_DIR`].
pub fn default_dataset_path() -> PathBuf {
    DATA_DIR.join(DATASET_FILE_NAME)
}

mod error {
    use std::path::PathBuf;

    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
        #[error("Invalid conversion row {line}: {reason}")]
        InvalidRow { line: usize, reason: String },
        #[error("Dataset file not found: {0}")]
        MissingDataset(PathBuf),
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use division_type::{DivisionKind, DivisionType, Scheme};
pub use error::{DataError, Result};
pub use names::{clean_name, convert_to_codename, strip_diacritics};
pub use processed::{
    ConversionMetadata, ConversionRef, ConversionStats, ConversionTable, NewProvinceRef,
    NewToOldEntry, NewWardRef, OldProvinceRef, OldRef, OldToNewEntry, OldWardRef,
    ProvinceConversionTable, WardConversionTable, build_province_table, build_ward_table,
};
pub use raw::{
    ConversionRow, CurrentDivisions, DistrictRecord, DivisionDataset, LegacyDivisions,
    ProvinceRecord, WardRecord, is_partly_merged_from_note,
};
