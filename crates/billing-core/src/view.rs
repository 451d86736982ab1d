//! # View Projection
//!
//! The rendered control tree as plain data: a pure function of the cart
//! scan, the selection state and the clinic catalog. Nothing here is stored;
//! the extension re-projects after every transition.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Billing                        (clinic billing OR any PSS program)     │
//! │  ☐ Home Pharma  ☐ Infusion Clinic        (clinic billing, no meds)      │
//! │  <Method heading>                                                       │
//! │  [Select Province ▾]                     (method selected)              │
//! │  [Select Clinic ▾]                       (province chosen)              │
//! │  ⛔ select appropriate billing            (needs attention)             │
//! │  ⚠ medication ships to clinic only       (has medication)              │
//! │  ⚠ supplies only sent to clinic          (Infusion Clinic selected)    │
//! │  PSS                                     (any program)                  │
//! │    ℹ enter patient ID                                                   │
//! │    [PSS Program Name 1: HEMOPHILIA] (disabled)   [Patient ID ____]     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Delivery Instructions                   (always)                       │
//! │    ℹ special requests                    [Delivery Instructions ____]  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::resolver::ClinicCatalog;
use crate::scanner::CartScan;
use crate::selection::{BillingAccess, SelectionState};
use crate::types::BillingMethod;

// =============================================================================
// Copy
// =============================================================================

pub const BILLING_HEADING: &str = "Billing";
pub const PSS_HEADING: &str = "PSS";
pub const DELIVERY_INSTRUCTIONS_HEADING: &str = "Delivery Instructions";
pub const PROVINCE_SELECT_LABEL: &str = "Select Province";
pub const CLINIC_SELECT_LABEL: &str = "Select Clinic";

pub const BILLING_ATTENTION_MESSAGE: &str = "Your cart has infusion clinic/home pharma supplies. \
Please select appropriate billing; failure to do so will result in order cancellation.";

pub const MEDICATION_MESSAGE: &str =
    "There is medication in the order, order can only be shipped to the clinic.";

pub const CLINIC_ONLY_MESSAGE: &str = "Supplies can only be sent to the clinic. Please do not \
modify the shipping address, as failure to do so will result in order cancellation. If you have \
any special requests, please enter your requests on delivery instructions section for approval.";

pub const PATIENT_ID_MESSAGE: &str = "Please enter appropriate patient ID.";

pub const DELIVERY_INSTRUCTIONS_MESSAGE: &str =
    "Please let us know if you have special delivery instruction/request.";

// =============================================================================
// Derived Flags
// =============================================================================

/// Flags computed from the scan and the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub requires_clinic_billing: bool,
    pub has_medication: bool,
    pub show_billing_warning_banner: bool,
}

impl DerivedFlags {
    pub fn derive(scan: &CartScan, state: &SelectionState) -> Self {
        DerivedFlags {
            requires_clinic_billing: scan.requires_clinic_billing,
            has_medication: scan.has_medication,
            show_billing_warning_banner: scan.requires_clinic_billing && state.needs_attention(),
        }
    }
}

// =============================================================================
// Controls
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum BannerStatus {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Banner {
    pub status: BannerStatus,
    pub message: String,
}

impl Banner {
    fn new(status: BannerStatus, message: &str) -> Self {
        Banner {
            status,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Checkbox {
    pub id: String,
    pub label: String,
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn same(text: &str) -> Self {
        SelectOption {
            label: text.to_string(),
            value: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SelectControl {
    pub label: String,
    pub options: Vec<SelectOption>,
    /// Empty when nothing is chosen yet.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TextField {
    pub label: String,
    pub name: String,
    pub value: String,
    pub disabled: bool,
}

// =============================================================================
// Sections
// =============================================================================

/// Read-only program name plus the editable patient ID for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PssProgramFields {
    /// Raw tag; event payloads refer to the program by this.
    pub program: String,
    pub program_name: TextField,
    pub patient_id: TextField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PssPanel {
    pub heading: String,
    pub banner: Banner,
    pub programs: Vec<PssProgramFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillingSection {
    pub heading: String,
    /// Empty when the checkboxes are hidden.
    pub checkboxes: Vec<Checkbox>,
    pub method_heading: Option<String>,
    pub province_select: Option<SelectControl>,
    pub clinic_select: Option<SelectControl>,
    pub banners: Vec<Banner>,
    pub pss: Option<PssPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DeliveryInstructionsSection {
    pub heading: String,
    pub banner: Banner,
    pub field: TextField,
}

/// The whole extension block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub flags: DerivedFlags,
    pub billing: Option<BillingSection>,
    pub delivery_instructions: DeliveryInstructionsSection,
}

impl CheckoutView {
    /// Projects the current state into a control tree.
    pub fn project(scan: &CartScan, state: &SelectionState, catalog: &dyn ClinicCatalog) -> Self {
        let flags = DerivedFlags::derive(scan, state);

        let billing = (scan.requires_clinic_billing || scan.has_programs())
            .then(|| billing_section(scan, state, catalog, &flags));

        CheckoutView {
            flags,
            billing,
            delivery_instructions: delivery_section(state),
        }
    }
}

fn billing_section(
    scan: &CartScan,
    state: &SelectionState,
    catalog: &dyn ClinicCatalog,
    flags: &DerivedFlags,
) -> BillingSection {
    let checkboxes = if state.access() == BillingAccess::Open {
        BillingMethod::ALL
            .iter()
            .map(|method| Checkbox {
                id: format!("checkbox-{}", method.control_value()),
                label: method.label().to_string(),
                value: method.control_value().to_string(),
                checked: state.billing_method() == Some(*method),
            })
            .collect()
    } else {
        Vec::new()
    };

    let method = state.billing_method();

    let province_select = method.map(|_| SelectControl {
        label: PROVINCE_SELECT_LABEL.to_string(),
        options: catalog.provinces().iter().map(|p| SelectOption::same(p)).collect(),
        value: state.province().unwrap_or_default().to_string(),
    });

    let clinic_select = match (method, state.province()) {
        (Some(method), Some(province)) => Some(SelectControl {
            label: CLINIC_SELECT_LABEL.to_string(),
            options: catalog
                .clinic_names(method, province)
                .iter()
                .map(|c| SelectOption::same(c))
                .collect(),
            value: state.clinic().unwrap_or_default().to_string(),
        }),
        _ => None,
    };

    let mut banners = Vec::new();
    if flags.show_billing_warning_banner {
        banners.push(Banner::new(BannerStatus::Critical, BILLING_ATTENTION_MESSAGE));
    }
    if flags.has_medication {
        banners.push(Banner::new(BannerStatus::Warning, MEDICATION_MESSAGE));
    }
    if flags.requires_clinic_billing && method == Some(BillingMethod::InfusionClinic) {
        banners.push(Banner::new(BannerStatus::Warning, CLINIC_ONLY_MESSAGE));
    }

    BillingSection {
        heading: BILLING_HEADING.to_string(),
        checkboxes,
        method_heading: method.map(|m| m.label().to_string()),
        province_select,
        clinic_select,
        banners,
        pss: scan.has_programs().then(|| pss_panel(state)),
    }
}

fn pss_panel(state: &SelectionState) -> PssPanel {
    let programs = state
        .patient_ids()
        .iter()
        .enumerate()
        .map(|(index, (program, patient_id))| PssProgramFields {
            program: program.raw().to_string(),
            program_name: TextField {
                label: format!("PSS Program Name {}", index + 1),
                name: format!("pss-program-name-{index}"),
                value: program.field_value(),
                disabled: true,
            },
            patient_id: TextField {
                label: "Patient ID".to_string(),
                name: format!("patient-id-{index}"),
                value: patient_id.clone(),
                disabled: false,
            },
        })
        .collect();

    PssPanel {
        heading: PSS_HEADING.to_string(),
        banner: Banner::new(BannerStatus::Info, PATIENT_ID_MESSAGE),
        programs,
    }
}

fn delivery_section(state: &SelectionState) -> DeliveryInstructionsSection {
    DeliveryInstructionsSection {
        heading: DELIVERY_INSTRUCTIONS_HEADING.to_string(),
        banner: Banner::new(BannerStatus::Info, DELIVERY_INSTRUCTIONS_MESSAGE),
        field: TextField {
            label: DELIVERY_INSTRUCTIONS_HEADING.to_string(),
            name: "delivery-instructions".to_string(),
            value: state.delivery_instructions().to_string(),
            disabled: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::test_support::TinyCatalog;
    use crate::scanner::scan;
    use crate::types::CartLine;

    fn project(lines: &[CartLine], state_fn: impl FnOnce(SelectionState) -> SelectionState) -> CheckoutView {
        let scan = scan(lines);
        let state = state_fn(SelectionState::for_cart(&scan));
        CheckoutView::project(&scan, &state, &TinyCatalog::new())
    }

    #[test]
    fn test_plain_cart_only_shows_delivery_instructions() {
        let view = project(&[CartLine::new("X", vec![])], |s| s);
        assert!(view.billing.is_none());
        assert_eq!(view.delivery_instructions.heading, "Delivery Instructions");
        assert!(!view.flags.show_billing_warning_banner);
    }

    #[test]
    fn test_medication_cart_hides_checkboxes() {
        let view = project(&[CartLine::tagged("MED", "ICN/HOMEPHARMA")], |s| s);
        let billing = view.billing.expect("billing section");

        assert!(view.flags.has_medication);
        assert!(billing.checkboxes.is_empty());
        assert_eq!(billing.method_heading.as_deref(), Some("Infusion Clinic"));
        assert!(billing.province_select.is_some());

        let messages: Vec<&str> = billing.banners.iter().map(|b| b.message.as_str()).collect();
        assert!(messages.contains(&MEDICATION_MESSAGE));
        assert!(messages.contains(&CLINIC_ONLY_MESSAGE));
        assert!(messages.contains(&BILLING_ATTENTION_MESSAGE));
    }

    #[test]
    fn test_open_cart_shows_unchecked_checkboxes_and_attention_banner() {
        let view = project(&[CartLine::tagged("SUP-1", "ICN/HOMEPHARMA")], |s| s);
        let billing = view.billing.expect("billing section");

        assert_eq!(billing.checkboxes.len(), 2);
        assert!(billing.checkboxes.iter().all(|c| !c.checked));
        assert_eq!(billing.checkboxes[0].id, "checkbox-home-pharma");
        assert!(billing.province_select.is_none());
        assert_eq!(billing.banners.len(), 1);
        assert_eq!(billing.banners[0].status, BannerStatus::Critical);
    }

    #[test]
    fn test_selects_follow_choices() {
        let view = project(&[CartLine::tagged("SUP-1", "Management")], |s| {
            s.select(BillingMethod::InfusionClinic)
                .and_then(|s| s.choose_province("Ontario"))
                .and_then(|s| s.choose_clinic("Downtown Infusion"))
                .unwrap()
        });
        let billing = view.billing.expect("billing section");

        let province = billing.province_select.expect("province select");
        assert_eq!(province.value, "Ontario");
        assert_eq!(province.options.len(), 2);

        let clinic = billing.clinic_select.expect("clinic select");
        assert_eq!(clinic.value, "Downtown Infusion");
        assert_eq!(clinic.options[0].value, "Downtown Infusion");

        assert!(!view.flags.show_billing_warning_banner);
        assert_eq!(billing.banners.len(), 1);
        assert_eq!(billing.banners[0].message, CLINIC_ONLY_MESSAGE);
    }

    #[test]
    fn test_access_to_hope_pss_panel() {
        let view = project(&[CartLine::tagged("X", "opdivo-yervoy-regimen-and-opdualag")], |s| s);
        let billing = view.billing.expect("billing section");

        assert!(billing.checkboxes.is_empty());
        assert!(billing.banners.is_empty());

        let pss = billing.pss.expect("pss panel");
        assert_eq!(pss.programs.len(), 1);
        let fields = &pss.programs[0];
        assert_eq!(fields.program_name.value, "ACCESS TO HOPE");
        assert!(fields.program_name.disabled);
        assert_eq!(fields.program_name.label, "PSS Program Name 1");
        assert_eq!(fields.patient_id.label, "Patient ID");
        assert!(!fields.patient_id.disabled);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = project(&[CartLine::tagged("SUP-1", "ICN/HOMEPHARMA")], |s| s);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["flags"]["requiresClinicBilling"], true);
        assert!(json["billing"]["provinceSelect"].is_null());
        assert_eq!(json["billing"]["banners"][0]["status"], "critical");
    }
}
