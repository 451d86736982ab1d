//! # Address Resolver
//!
//! Maps a completed `(billing method, province, clinic)` choice to the host
//! mutations that record it.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog.clinic(method, province, clinic)                               │
//! │        │                                                                │
//! │        ├── None ───────────────► no plan (lookup miss, silent no-op)    │
//! │        │                                                                │
//! │        └── Some(record)                                                 │
//! │              │                                                          │
//! │              ├── InfusionClinic ─► 1. attribute "ICN/HOME PHARMA        │
//! │              │                        Account" = clinic                 │
//! │              │                     2. full one-time clinic address, CA  │
//! │              │                                                          │
//! │              └── HomePharma ─────► 1. same attribute                    │
//! │                                    2. partial update clearing address2  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Plans are values; issuing them is the extension's job.

use serde::Serialize;

use crate::programs::ProgramTag;
use crate::types::{BillingMethod, CheckoutMutation, ClinicRecord, MailingAddress};
use crate::{ACCOUNT_ATTRIBUTE_KEY, DELIVERY_INSTRUCTIONS_ATTRIBUTE_KEY};

// =============================================================================
// Catalog Seam
// =============================================================================

/// Read-only access to the province and clinic tables.
///
/// Implemented by the directory crate; tests use small in-memory tables.
pub trait ClinicCatalog {
    /// Province display names, in table order.
    fn provinces(&self) -> Vec<String>;

    /// Clinic names for a method and province, in table order.
    /// Unknown provinces yield an empty list.
    fn clinic_names(&self, method: BillingMethod, province: &str) -> Vec<String>;

    /// Looks up one clinic record.
    fn clinic(&self, method: BillingMethod, province: &str, clinic: &str) -> Option<&ClinicRecord>;
}

// =============================================================================
// Address Plan
// =============================================================================

/// The mutations that follow from one resolved clinic choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPlan {
    pub method: BillingMethod,
    pub clinic: String,
    pub address: MailingAddress,
}

impl AddressPlan {
    /// Attribute update first, then the address change.
    pub fn mutations(&self) -> Vec<CheckoutMutation> {
        vec![
            CheckoutMutation::attribute(ACCOUNT_ATTRIBUTE_KEY, self.clinic.clone()),
            CheckoutMutation::shipping_address(self.address.clone()),
        ]
    }
}

/// Resolves a clinic choice against the catalog.
///
/// Returns `None` when the clinic is not listed under the province in the
/// table for `method`.
pub fn resolve(
    method: BillingMethod,
    province: &str,
    clinic: &str,
    catalog: &dyn ClinicCatalog,
) -> Option<AddressPlan> {
    let record = catalog.clinic(method, province, clinic)?;

    let address = match method {
        BillingMethod::InfusionClinic => MailingAddress::for_clinic(clinic, record),
        // Home-pharma orders keep the customer's own address.
        BillingMethod::HomePharma => MailingAddress::clear_secondary_line(),
    };

    Some(AddressPlan {
        method,
        clinic: clinic.to_string(),
        address,
    })
}

// =============================================================================
// Free-Text Mutations
// =============================================================================

/// Stores a patient ID under the program's uppercased display name.
pub fn patient_id_mutation(program: &ProgramTag, id: &str) -> CheckoutMutation {
    CheckoutMutation::attribute(program.attribute_key(), id)
}

pub fn delivery_instructions_mutation(text: &str) -> CheckoutMutation {
    CheckoutMutation::attribute(DELIVERY_INSTRUCTIONS_ATTRIBUTE_KEY, text)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// One province, one clinic per table.
    pub struct TinyCatalog {
        pub record: ClinicRecord,
    }

    impl TinyCatalog {
        pub fn new() -> Self {
            TinyCatalog {
                record: ClinicRecord {
                    address: "100 King St W".to_string(),
                    city: "Toronto".to_string(),
                    province: "ON".to_string(),
                    postal_code: "M5X 1A9".to_string(),
                    phone: "416-555-0100".to_string(),
                },
            }
        }

        fn clinic_for(method: BillingMethod) -> &'static str {
            match method {
                BillingMethod::HomePharma => "Lakeshore Home Pharmacy",
                BillingMethod::InfusionClinic => "Downtown Infusion",
            }
        }
    }

    impl ClinicCatalog for TinyCatalog {
        fn provinces(&self) -> Vec<String> {
            vec!["Ontario".to_string(), "Quebec".to_string()]
        }

        fn clinic_names(&self, method: BillingMethod, province: &str) -> Vec<String> {
            if province == "Ontario" {
                vec![Self::clinic_for(method).to_string()]
            } else {
                Vec::new()
            }
        }

        fn clinic(&self, method: BillingMethod, province: &str, clinic: &str) -> Option<&ClinicRecord> {
            (province == "Ontario" && clinic == Self::clinic_for(method)).then_some(&self.record)
        }
    }
}
