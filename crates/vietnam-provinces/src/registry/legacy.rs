//! Pre-reform divisions: province, district, ward.
use tracing::{info, instrument};
use vietnam_provinces_data::{
    DistrictRecord, DivisionKind, DivisionType, LegacyDivisions, ProvinceRecord, Scheme,
    WardRecord, clean_name, convert_to_codename,
};

use super::{Registry, RegistryError, error::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Province {
    pub code: u32,
    pub name: String,
    pub codename: String,
    pub division_type: DivisionType,
    pub phone_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct District {
    pub code: u32,
    pub name: String,
    pub codename: String,
    pub division_type: DivisionType,
    pub province_code: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ward {
    pub code: u32,
    pub name: String,
    pub codename: String,
    pub division_type: DivisionType,
    pub district_code: u32,
    /// Resolved through the district when the registry is built.
    pub province_code: u32,
}

fn codename_or_derived(codename: Option<&String>, name: &str) -> String {
    codename.cloned().unwrap_or_else(|| convert_to_codename(name))
}

impl Province {
    pub fn from_record(record: &ProvinceRecord) -> Self {
        let name = clean_name(&record.name);
        Self {
            code: record.code,
            codename: codename_or_derived(record.codename.as_ref(), &name),
            division_type: DivisionType::from_province_name(&name),
            phone_code: record.phone_code,
            name,
        }
    }
}

impl District {
    pub fn from_record(record: &DistrictRecord) -> Self {
        let name = clean_name(&record.name);
        Self {
            code: record.code,
            codename: codename_or_derived(record.codename.as_ref(), &name),
            division_type: DivisionType::from_district_name(&name),
            province_code: record.province_code,
            name,
        }
    }
}

impl Ward {
    fn from_record(record: &WardRecord, province_code: u32) -> Self {
        let name = clean_name(&record.name);
        Self {
            code: record.code,
            codename: codename_or_derived(record.codename.as_ref(), &name),
            division_type: DivisionType::from_ward_name(&name),
            district_code: record.parent_code,
            province_code,
            name,
        }
    }
}

impl_division!(Province, DivisionKind::Province, Scheme::Legacy, |_: &Province| None);
impl_division!(District, DivisionKind::District, Scheme::Legacy, |d: &District| Some(
    d.province_code
));
impl_division!(Ward, DivisionKind::Ward, Scheme::Legacy, |w: &Ward| Some(w.district_code));

/// Provinces, districts and wards of the legacy scheme.
#[derive(Debug, Clone)]
pub struct LegacyRegistry {
    provinces: Registry<Province>,
    districts: Registry<District>,
    wards: Registry<Ward>,
}

impl LegacyRegistry {
    #[instrument(name = "Build legacy registry", level = "info", skip_all)]
    pub fn from_records(records: &LegacyDivisions) -> Result<Self> {
        let provinces =
            Registry::new(records.provinces.iter().map(Province::from_record).collect())?;
        let districts =
            Registry::new(records.districts.iter().map(District::from_record).collect())?;
        districts.ensure_parents(&provinces)?;

        let wards = records
            .wards
            .iter()
            .map(|record| {
                let district = districts.get(record.parent_code).ok_or(
                    RegistryError::MissingParent {
                        scheme: Scheme::Legacy,
                        kind: DivisionKind::Ward,
                        code: record.code,
                        parent: record.parent_code,
                    },
                )?;
                Ok(Ward::from_record(record, district.province_code))
            })
            .collect::<Result<Vec<_>>>()?;
        let wards = Registry::new(wards)?;

        info!(
            provinces = provinces.len(),
            districts = districts.len(),
            wards = wards.len(),
            "Legacy registry ready"
        );
        Ok(Self {
            provinces,
            districts,
            wards,
        })
    }

    pub fn provinces(&self) -> &Registry<Province> {
        &self.provinces
    }

    pub fn districts(&self) -> &Registry<District> {
        &self.districts
    }

    pub fn wards(&self) -> &Registry<Ward> {
        &self.wards
    }

    pub fn districts_by_province(&self, province_code: u32) -> impl Iterator<Item = &District> + '_ {
        self.districts.by_parent(province_code)
    }

    pub fn wards_by_district(&self, district_code: u32) -> impl Iterator<Item = &Ward> + '_ {
        self.wards.by_parent(district_code)
    }

    pub fn wards_by_province(&self, province_code: u32) -> impl Iterator<Item = &Ward> + '_ {
        self.districts_by_province(province_code)
            .flat_map(|district| self.wards_by_district(district.code))
    }

    /// Province of a legacy ward, through its district.
    pub fn ward_province_code(&self, ward: &Ward) -> Option<u32> {
        self.districts
            .get(ward.district_code)
            .map(|district| district.province_code)
    }
}
