//! # Cart Scanner
//!
//! Runs once when the extension mounts and derives everything the rest of
//! the extension needs to know about the cart.
//!
//! ## Scan Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each line, for each attribute with key "tag":                      │
//! │                                                                         │
//! │    value ∈ {"ICN/HOMEPHARMA", "Management"}                             │
//! │        │                                                                │
//! │        ├──► requires_clinic_billing = true                              │
//! │        └──► line.sku == "MED"  ──► has_medication = true (latched)      │
//! │                                                                         │
//! │    any other value                                                      │
//! │        └──► programs += value   (dedup by raw tag, first-seen order)    │
//! │                                                                         │
//! │  No tag anywhere ──► (false, false, [])                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::programs::ProgramTag;
use crate::types::CartLine;
use crate::{CLINIC_BILLING_TAGS, MEDICATION_SKU};

/// What the cart implies for billing. Fixed for the whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartScan {
    /// Some line is tagged for infusion-clinic / home-pharma billing.
    pub requires_clinic_billing: bool,

    /// A clinic-billing line carries the medication SKU.
    pub has_medication: bool,

    /// PSS programs needing a patient ID, in first-seen order.
    pub programs: Vec<ProgramTag>,
}

impl CartScan {
    /// True when the PSS panel has anything to show.
    pub fn has_programs(&self) -> bool {
        !self.programs.is_empty()
    }
}

/// Returns true for the tag values that put an order on clinic billing.
pub fn is_clinic_billing_tag(value: &str) -> bool {
    CLINIC_BILLING_TAGS.contains(&value)
}

/// Scans the cart lines.
///
/// `has_medication` only ever goes from false to true; later clinic-billing
/// lines without the medication SKU do not reset it.
pub fn scan(lines: &[CartLine]) -> CartScan {
    let mut result = CartScan::default();

    for line in lines {
        for tag in line.tags() {
            if is_clinic_billing_tag(tag) {
                result.requires_clinic_billing = true;
                if line.sku() == Some(MEDICATION_SKU) {
                    result.has_medication = true;
                }
            } else if !result.programs.iter().any(|p| p.raw() == tag) {
                result.programs.push(ProgramTag::new(tag));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    #[test]
    fn test_empty_cart() {
        assert_eq!(scan(&[]), CartScan::default());
    }

    #[test]
    fn test_lines_without_tags_carry_no_signal() {
        let lines = vec![
            CartLine::new("MED", vec![]),
            CartLine::new("X", vec![Attribute::new("color", "blue")]),
            CartLine::default(),
        ];
        let result = scan(&lines);
        assert!(!result.requires_clinic_billing);
        assert!(!result.has_medication);
        assert!(result.programs.is_empty());
    }

    #[test]
    fn test_medication_line() {
        let result = scan(&[CartLine::tagged("MED", "ICN/HOMEPHARMA")]);
        assert!(result.requires_clinic_billing);
        assert!(result.has_medication);
        assert!(result.programs.is_empty());
    }

    #[test]
    fn test_management_tag_requires_clinic_billing() {
        let result = scan(&[CartLine::tagged("SUP-1", "Management")]);
        assert!(result.requires_clinic_billing);
        assert!(!result.has_medication);
    }

    #[test]
    fn test_medication_detected_regardless_of_line_order() {
        let supplies = CartLine::tagged("SUP-1", "ICN/HOMEPHARMA");
        let meds = CartLine::tagged("MED", "ICN/HOMEPHARMA");

        let forward = scan(&[supplies.clone(), meds.clone()]);
        let backward = scan(&[meds, supplies]);

        assert!(forward.has_medication);
        assert!(backward.has_medication);
    }

    #[test]
    fn test_medication_sku_without_clinic_tag_is_ignored() {
        let result = scan(&[
            CartLine::tagged("MED", "keytruda-support"),
            CartLine::tagged("SUP-1", "ICN/HOMEPHARMA"),
        ]);
        assert!(result.requires_clinic_billing);
        assert!(!result.has_medication);
    }

    #[test]
    fn test_programs_renamed_and_deduplicated_by_raw_tag() {
        let lines = vec![
            CartLine::tagged("A", "sanofi-hemophilia-alprolix-eloctate"),
            CartLine::tagged("B", "keytruda-support"),
            CartLine::tagged("C", "sanofi-hemophilia-alprolix-eloctate"),
            CartLine::tagged("D", "ICN/HOMEPHARMA"),
        ];
        let result = scan(&lines);
        let names: Vec<&str> = result.programs.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Hemophilia", "keytruda-support"]);
    }

    #[test]
    fn test_access_to_hope_program() {
        let result = scan(&[CartLine::tagged("X", "opdivo-yervoy-regimen-and-opdualag")]);
        assert!(!result.requires_clinic_billing);
        assert_eq!(result.programs.len(), 1);
        assert_eq!(result.programs[0].display_name(), "Access to Hope");
    }
}
