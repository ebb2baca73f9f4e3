//! Validated input records, as delivered by the ingestion step.
//!
//! The dataset is a single JSON document holding both schemes and the ward conversion rows.
//! Nothing here interprets names; records are taken as they come and the search crate derives
//! types and codenames when it builds its registries.
use std::{fs::File, io::BufReader, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceRecord {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    /// Dialing code merged in by the phone enrichment step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictRecord {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    pub province_code: u32,
}

/// A ward in either scheme. The parent is a province (current) or a district (legacy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardRecord {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(alias = "province_code", alias = "district_code")]
    pub parent_code: u32,
}

/// One line of the official legacy/current ward conversion sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRow {
    pub old_ward_code: u32,
    pub old_ward_name: String,
    pub old_district_code: u32,
    pub old_province_code: u32,
    pub new_ward_code: u32,
    pub new_ward_name: String,
    pub new_province_code: u32,
    #[serde(default)]
    pub is_partly_merged: bool,
}

impl ConversionRow {
    /// Rejects rows with a zero code; codes are positive in both schemes.
    pub fn validate(&self, line: usize) -> Result<()> {
        let fields = [
            ("old_ward_code", self.old_ward_code),
            ("old_district_code", self.old_district_code),
            ("old_province_code", self.old_province_code),
            ("new_ward_code", self.new_ward_code),
            ("new_province_code", self.new_province_code),
        ];
        match fields.iter().find(|(_, code)| *code == 0) {
            Some((field, _)) => Err(DataError::InvalidRow {
                line,
                reason: format!("{field} must be positive"),
            }),
            None => Ok(()),
        }
    }
}

/// A transfer is partial unless the remark says the whole unit ("toàn bộ") moved.
pub fn is_partly_merged_from_note(note: &str) -> bool {
    !note.to_lowercase().contains("toàn bộ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDivisions {
    pub provinces: Vec<ProvinceRecord>,
    pub wards: Vec<WardRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDivisions {
    pub provinces: Vec<ProvinceRecord>,
    pub districts: Vec<DistrictRecord>,
    pub wards: Vec<WardRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionDataset {
    pub current: CurrentDivisions,
    pub legacy: LegacyDivisions,
    #[serde(default)]
    pub ward_conversion: Vec<ConversionRow>,
}

impl DivisionDataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dataset: Self = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    #[instrument(name = "Load division dataset", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::MissingDataset(path.to_path_buf()));
        }
        let dataset = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            current_provinces = dataset.current.provinces.len(),
            current_wards = dataset.current.wards.len(),
            legacy_provinces = dataset.legacy.provinces.len(),
            legacy_districts = dataset.legacy.districts.len(),
            legacy_wards = dataset.legacy.wards.len(),
            conversion_rows = dataset.ward_conversion.len(),
            "Loaded division dataset"
        );
        Ok(dataset)
    }

    /// Load `divisions.json` from the configured data directory.
    pub fn from_data_dir() -> Result<Self> {
        Self::from_path(crate::default_dataset_path())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        for (idx, row) in self.ward_conversion.iter().enumerate() {
            row.validate(idx + 1)?;
        }
        debug!(rows = self.ward_conversion.len(), "Conversion rows validated");
        Ok(())
    }
}
