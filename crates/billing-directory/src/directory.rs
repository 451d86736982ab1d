//! # Clinic Directory
//!
//! In-memory province and clinic tables, loaded once at startup.
//!
//! ## Data File Format
//! ```json
//! {
//!   "provinces":  { "ON": "Ontario", "QC": "Quebec" },
//!   "homePharma": { "Ontario": { "Lakeshore Home Pharmacy": { "Address": "...", ... } } },
//!   "infusion":   { "Ontario": { "Downtown Infusion Clinic": { "Address": "...", ... } } }
//! }
//! ```
//!
//! Clinic tables are keyed by province *display name*, because that is the
//! value the province dropdown reports.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use billing_core::{BillingMethod, ClinicCatalog, ClinicRecord};

use crate::error::{DirectoryError, DirectoryResult};

/// Sample data compiled into the binary.
const BUNDLED_DIRECTORY: &str = include_str!("../data/clinics.sample.json");

/// Province display name → clinic name → record.
pub type ClinicTable = IndexMap<String, IndexMap<String, ClinicRecord>>;

/// The full set of lookup tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicDirectory {
    /// Province code → display name.
    pub provinces: IndexMap<String, String>,

    #[serde(default)]
    pub home_pharma: ClinicTable,

    #[serde(default)]
    pub infusion: ClinicTable,
}

impl ClinicDirectory {
    /// Parses and checks a directory from JSON text.
    pub fn from_json_str(json: &str) -> DirectoryResult<Self> {
        let directory: ClinicDirectory = serde_json::from_str(json)?;
        directory.validate()?;

        info!(
            provinces = directory.provinces.len(),
            home_pharma_clinics = count_clinics(&directory.home_pharma),
            infusion_clinics = count_clinics(&directory.infusion),
            "Clinic directory loaded"
        );

        Ok(directory)
    }

    /// Reads a directory file from disk.
    pub fn from_path(path: &Path) -> DirectoryResult<Self> {
        debug!(?path, "Reading clinic directory");
        let json = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The sample directory shipped with the crate.
    pub fn bundled() -> DirectoryResult<Self> {
        Self::from_json_str(BUNDLED_DIRECTORY)
    }

    /// Returns the table consulted for a billing method.
    pub fn table(&self, method: BillingMethod) -> &ClinicTable {
        match method {
            BillingMethod::HomePharma => &self.home_pharma,
            BillingMethod::InfusionClinic => &self.infusion,
        }
    }

    /// Checks the cross-table invariants.
    ///
    /// ## Rules
    /// - At least one province
    /// - Every clinic table key is a known province display name
    /// - Every record has address, city, province and postal code
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.provinces.is_empty() {
            return Err(DirectoryError::EmptyProvinceList);
        }

        for method in BillingMethod::ALL {
            let table_name = table_name(method);

            for (province, clinics) in self.table(method) {
                if !self.provinces.values().any(|p| p == province) {
                    return Err(DirectoryError::UnknownProvince {
                        table: table_name.to_string(),
                        province: province.clone(),
                    });
                }

                for (clinic, record) in clinics {
                    let required = [
                        ("Address", &record.address),
                        ("City", &record.city),
                        ("Province", &record.province),
                        ("Postal Code", &record.postal_code),
                    ];
                    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
                        return Err(DirectoryError::IncompleteRecord {
                            table: table_name.to_string(),
                            province: province.clone(),
                            clinic: clinic.clone(),
                            field: field.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl ClinicCatalog for ClinicDirectory {
    fn provinces(&self) -> Vec<String> {
        self.provinces.values().cloned().collect()
    }

    fn clinic_names(&self, method: BillingMethod, province: &str) -> Vec<String> {
        self.table(method)
            .get(province)
            .map(|clinics| clinics.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn clinic(&self, method: BillingMethod, province: &str, clinic: &str) -> Option<&ClinicRecord> {
        self.table(method).get(province)?.get(clinic)
    }
}

fn table_name(method: BillingMethod) -> &'static str {
    match method {
        BillingMethod::HomePharma => "homePharma",
        BillingMethod::InfusionClinic => "infusion",
    }
}

fn count_clinics(table: &ClinicTable) -> usize {
    table.values().map(IndexMap::len).sum()
}
