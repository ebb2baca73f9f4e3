//! Post-reform divisions: provinces and the wards directly under them.
use tracing::{info, instrument};
use vietnam_provinces_data::{
    CurrentDivisions, DivisionKind, DivisionType, ProvinceRecord, Scheme, WardRecord, clean_name,
    convert_to_codename,
};

use super::{Registry, error::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Province {
    pub code: u32,
    pub name: String,
    pub codename: String,
    pub division_type: DivisionType,
    pub phone_code: Option<u16>,
}

impl Province {
    pub fn from_record(record: &ProvinceRecord) -> Self {
        let name = clean_name(&record.name);
        Self {
            code: record.code,
            codename: record
                .codename
                .clone()
                .unwrap_or_else(|| convert_to_codename(&name)),
            division_type: DivisionType::from_province_name(&name),
            phone_code: record.phone_code,
            name,
        }
    }
}

impl_division!(Province, DivisionKind::Province, Scheme::Current, |_: &Province| None);

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ward {
    pub code: u32,
    pub name: String,
    pub codename: String,
    pub division_type: DivisionType,
    pub province_code: u32,
}

impl Ward {
    pub fn from_record(record: &WardRecord) -> Self {
        let name = clean_name(&record.name);
        Self {
            code: record.code,
            codename: record
                .codename
                .clone()
                .unwrap_or_else(|| convert_to_codename(&name)),
            division_type: DivisionType::from_ward_name(&name),
            province_code: record.parent_code,
            name,
        }
    }
}

impl_division!(Ward, DivisionKind::Ward, Scheme::Current, |w: &Ward| Some(w.province_code));

/// Provinces and wards of the current scheme.
#[derive(Debug, Clone)]
pub struct CurrentRegistry {
    provinces: Registry<Province>,
    wards: Registry<Ward>,
}

impl CurrentRegistry {
    /// Build both registries and check every ward points at a known province.
    #[instrument(name = "Build current registry", level = "info", skip_all)]
    pub fn from_records(records: &CurrentDivisions) -> Result<Self> {
        let provinces = Registry::new(records.provinces.iter().map(Province::from_record).collect())?;
        let wards = Registry::new(records.wards.iter().map(Ward::from_record).collect())?;
        wards.ensure_parents(&provinces)?;

        info!(
            provinces = provinces.len(),
            wards = wards.len(),
            "Current registry ready"
        );
        Ok(Self { provinces, wards })
    }

    pub fn provinces(&self) -> &Registry<Province> {
        &self.provinces
    }

    pub fn wards(&self) -> &Registry<Ward> {
        &self.wards
    }

    pub fn wards_by_province(&self, province_code: u32) -> impl Iterator<Item = &Ward> + '_ {
        self.wards.by_parent(province_code)
    }
}

#[cfg(test)]
mod tests {
    use vietnam_provinces_data::test_data::sample_dataset;

    use super::*;
    use crate::registry::RegistryError;

    #[test]
    fn test_derived_fields() {
        let registry = CurrentRegistry::from_records(&sample_dataset().current).unwrap();

        let hcm = registry.provinces().by_code(79).unwrap();
        assert_eq!(hcm.division_type, DivisionType::ThanhPhoTrungUong);
        assert_eq!(hcm.codename, "thanh_pho_ho_chi_minh");
        assert_eq!(hcm.phone_code, Some(28));

        let con_dao = registry.wards().by_code(26944).unwrap();
        assert_eq!(con_dao.division_type, DivisionType::DacKhu);
        assert_eq!(con_dao.province_code, 79);
    }

    #[test]
    fn test_wards_by_province() {
        let registry = CurrentRegistry::from_records(&sample_dataset().current).unwrap();
        let codes: Vec<u32> = registry.wards_by_province(8).map(|w| w.code).collect();
        assert_eq!(codes, vec![691, 2212]);
    }

    #[test]
    fn test_orphan_ward_rejected() {
        let mut records = sample_dataset().current;
        records.wards.push(WardRecord {
            code: 99990,
            name: "Phường Mồ Côi".to_string(),
            codename: None,
            parent_code: 1,
        });
        let err = CurrentRegistry::from_records(&records).unwrap_err();
        assert_eq!(
            err,
            RegistryError::MissingParent {
                scheme: Scheme::Current,
                kind: DivisionKind::Ward,
                code: 99990,
                parent: 1,
            }
        );
    }
}
