//! Crossing between the legacy and current schemes.
//!
//! The registries of the two schemes never reference each other; every conversion goes through
//! the tables held here.
use std::fmt;

use tracing::{info, instrument};
use vietnam_provinces_data::{
    ConversionRow, DivisionKind, NewProvinceRef, NewToOldEntry, NewWardRef, OldProvinceRef,
    OldToNewEntry, OldWardRef, ProvinceConversionTable, WardConversionTable,
    build_province_table, build_ward_table,
};

pub use error::BridgeError;
use error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Legacy code to current codes.
    Forward,
    /// Current code to legacy codes.
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "legacy",
            Self::Backward => "current",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConversionBridge {
    wards: WardConversionTable,
    provinces: ProvinceConversionTable,
}

impl ConversionBridge {
    #[instrument(name = "Build conversion bridge", level = "info", skip_all)]
    pub fn from_rows(rows: &[ConversionRow]) -> Self {
        let bridge = Self::from_tables(build_ward_table(rows), build_province_table(rows));
        info!(
            ward_stats = ?bridge.wards.stats(),
            province_stats = ?bridge.provinces.stats(),
            "Conversion bridge ready"
        );
        bridge
    }

    pub fn from_tables(wards: WardConversionTable, provinces: ProvinceConversionTable) -> Self {
        Self { wards, provinces }
    }

    pub fn forward_ward(&self, legacy_code: u32) -> Result<&OldToNewEntry<OldWardRef, NewWardRef>> {
        self.wards
            .forward(legacy_code)
            .ok_or_else(|| BridgeError::not_found(DivisionKind::Ward, Direction::Forward, legacy_code))
    }

    pub fn backward_ward(&self, current_code: u32) -> Result<&NewToOldEntry<OldWardRef, NewWardRef>> {
        self.wards
            .backward(current_code)
            .ok_or_else(|| {
                BridgeError::not_found(DivisionKind::Ward, Direction::Backward, current_code)
            })
    }

    pub fn forward_province(
        &self,
        legacy_code: u32,
    ) -> Result<&OldToNewEntry<OldProvinceRef, NewProvinceRef>> {
        self.provinces.forward(legacy_code).ok_or_else(|| {
            BridgeError::not_found(DivisionKind::Province, Direction::Forward, legacy_code)
        })
    }

    pub fn backward_province(
        &self,
        current_code: u32,
    ) -> Result<&NewToOldEntry<OldProvinceRef, NewProvinceRef>> {
        self.provinces.backward(current_code).ok_or_else(|| {
            BridgeError::not_found(DivisionKind::Province, Direction::Backward, current_code)
        })
    }

    pub fn wards(&self) -> &WardConversionTable {
        &self.wards
    }

    pub fn provinces(&self) -> &ProvinceConversionTable {
        &self.provinces
    }
}

mod error {
    use thiserror::Error;
    use vietnam_provinces_data::DivisionKind;

    use super::Direction;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum BridgeError {
        #[error("No conversion entry for {direction} {level} code {code}")]
        NotFound {
            level: DivisionKind,
            direction: Direction,
            code: u32,
        },
    }

    impl BridgeError {
        pub(super) fn not_found(level: DivisionKind, direction: Direction, code: u32) -> Self {
            Self::NotFound {
                level,
                direction,
                code,
            }
        }
    }

    pub type Result<T> = std::result::Result<T, BridgeError>;
}
