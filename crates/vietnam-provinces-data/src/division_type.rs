//! Administrative division categories.
//!
//! The type of a division is read from the leading token of its display name. Each level has
//! a total mapping with a fallback, so every record gets exactly one [`DivisionType`] at
//! construction and it never changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchy level of a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionKind {
    Province,
    District,
    Ward,
}

impl DivisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Province => "province",
            Self::District => "district",
            Self::Ward => "ward",
        }
    }
}

impl fmt::Display for DivisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coding scheme a division belongs to. Codes from different schemes are unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Post-2025 two level scheme (province, ward).
    Current,
    /// Pre-2025 three level scheme (province, district, ward).
    Legacy,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "Current",
            Self::Legacy => "Legacy",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionType {
    Tinh,
    ThanhPhoTrungUong,
    Huyen,
    Quan,
    ThanhPho,
    ThiXa,
    Xa,
    ThiTran,
    Phuong,
    DacKhu,
}

const PROVINCE_PREFIXES: &[(&str, DivisionType)] = &[
    ("thành phố ", DivisionType::ThanhPhoTrungUong),
    ("tỉnh ", DivisionType::Tinh),
];

const DISTRICT_PREFIXES: &[(&str, DivisionType)] = &[
    ("thành phố ", DivisionType::ThanhPho),
    ("thị xã ", DivisionType::ThiXa),
    ("quận ", DivisionType::Quan),
    ("huyện ", DivisionType::Huyen),
];

const WARD_PREFIXES: &[(&str, DivisionType)] = &[
    ("thị trấn ", DivisionType::ThiTran),
    ("phường ", DivisionType::Phuong),
    ("xã ", DivisionType::Xa),
    ("đặc khu ", DivisionType::DacKhu),
];

impl DivisionType {
    /// Vietnamese label, lower case.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tinh => "tỉnh",
            Self::ThanhPhoTrungUong => "thành phố trung ương",
            Self::Huyen => "huyện",
            Self::Quan => "quận",
            Self::ThanhPho => "thành phố",
            Self::ThiXa => "thị xã",
            Self::Xa => "xã",
            Self::ThiTran => "thị trấn",
            Self::Phuong => "phường",
            Self::DacKhu => "đặc khu",
        }
    }

    pub fn from_province_name(name: &str) -> Self {
        match_prefix(name, PROVINCE_PREFIXES).unwrap_or(Self::Tinh)
    }

    pub fn from_district_name(name: &str) -> Self {
        match_prefix(name, DISTRICT_PREFIXES).unwrap_or(Self::Huyen)
    }

    pub fn from_ward_name(name: &str) -> Self {
        match_prefix(name, WARD_PREFIXES).unwrap_or(Self::Xa)
    }

    /// Ranking bonus used when several units share a name; more urban designations win.
    pub fn urban_bonus(self) -> u32 {
        match self {
            Self::ThiTran | Self::ThanhPhoTrungUong => 0,
            Self::Phuong | Self::Tinh => 3,
            Self::Xa => 6,
            _ => 0,
        }
    }
}

impl fmt::Display for DivisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn match_prefix(name: &str, table: &[(&str, DivisionType)]) -> Option<DivisionType> {
    let lowered = name.trim_start().to_lowercase();
    table
        .iter()
        .find(|(prefix, _)| lowered.starts_with(prefix))
        .map(|&(_, division_type)| division_type)
}
