//! # Selection State Machine
//!
//! Tracks the shopper's billing choices as one immutable value. Every
//! transition borrows the current state and returns a *new* state, or an
//! error and no change.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                    select(HomePharma)                                   │
//! │        ┌──────────────────────────────────────────┐                     │
//! │        │                                          ▼                     │
//! │  ┌───────────┐   select(InfusionClinic)   ┌──────────────────┐          │
//! │  │ NoBilling │ ─────────────────┐         │ HomePharma       │          │
//! │  └───────────┘                  │         │ Selected         │          │
//! │        ▲  ▲                     ▼         └──────────────────┘          │
//! │        │  │ deselect    ┌──────────────────┐      │   ▲                 │
//! │        │  └──────────── │ InfusionClinic   │ ◄────┘   │ select(HP)      │
//! │        │                │ Selected         │ ─────────┘                 │
//! │        │   deselect     └──────────────────┘  select(IC)                │
//! │        └────────────────────────(from either selected state)            │
//! │                                                                         │
//! │  Every select/deselect clears province + clinic.                        │
//! │  chooseProvince (method set)   → clears clinic, needs_attention = true  │
//! │  chooseClinic   (province set) → needs_attention = false                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Billing Access
//! Whether the shopper may pick a method at all is decided by the cart scan:
//! - no clinic-billing tag → [`BillingAccess::Unavailable`]
//! - clinic-billing with medication → [`BillingAccess::LockedToClinic`]
//!   (starts on Infusion Clinic, checkboxes hidden)
//! - otherwise → [`BillingAccess::Open`]

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::programs::ProgramTag;
use crate::scanner::CartScan;
use crate::types::BillingMethod;
use crate::validation::{normalize_patient_id, validate_selection};

/// Whether (and how) the billing method can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingAccess {
    /// The cart has no clinic-billing lines.
    Unavailable,
    /// The shopper picks Home Pharma or Infusion Clinic.
    Open,
    /// Medication order; always Infusion Clinic.
    LockedToClinic,
}

/// The shopper's choices for one checkout session.
///
/// ## Invariants
/// - At most one billing method is selected (it is an `Option`).
/// - `clinic` is only set when `province` is set, and `province` only when
///   a billing method is set.
/// - `needs_attention` is true whenever the method or province changed since
///   the last completed clinic choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    access: BillingAccess,
    billing_method: Option<BillingMethod>,
    province: Option<String>,
    clinic: Option<String>,
    needs_attention: bool,
    patient_ids: IndexMap<ProgramTag, String>,
    delivery_instructions: String,
}

impl SelectionState {
    /// Builds the initial state from the mount-time cart scan.
    pub fn for_cart(scan: &CartScan) -> Self {
        let access = match (scan.requires_clinic_billing, scan.has_medication) {
            (false, _) => BillingAccess::Unavailable,
            (true, true) => BillingAccess::LockedToClinic,
            (true, false) => BillingAccess::Open,
        };

        let billing_method = match access {
            BillingAccess::LockedToClinic => Some(BillingMethod::InfusionClinic),
            _ => None,
        };

        SelectionState {
            access,
            billing_method,
            province: None,
            clinic: None,
            needs_attention: scan.requires_clinic_billing,
            patient_ids: scan
                .programs
                .iter()
                .map(|p| (p.clone(), String::new()))
                .collect(),
            delivery_instructions: String::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn access(&self) -> BillingAccess {
        self.access
    }

    pub fn billing_method(&self) -> Option<BillingMethod> {
        self.billing_method
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    pub fn clinic(&self) -> Option<&str> {
        self.clinic.as_deref()
    }

    /// Drives the "select appropriate billing" warning banner.
    pub fn needs_attention(&self) -> bool {
        self.needs_attention
    }

    /// Patient IDs keyed by program, in cart order.
    pub fn patient_ids(&self) -> &IndexMap<ProgramTag, String> {
        &self.patient_ids
    }

    pub fn patient_id(&self, program: &ProgramTag) -> Option<&str> {
        self.patient_ids.get(program).map(String::as_str)
    }

    pub fn delivery_instructions(&self) -> &str {
        &self.delivery_instructions
    }

    /// Returns `(method, province, clinic)` once all three are chosen.
    pub fn completed_selection(&self) -> Option<(BillingMethod, &str, &str)> {
        Some((self.billing_method?, self.province.as_deref()?, self.clinic.as_deref()?))
    }

    /// True while a method is chosen but the clinic (and so the shipping
    /// address override) is not yet settled.
    pub fn is_address_pending(&self) -> bool {
        self.billing_method.is_some() && self.clinic.is_none()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Selects a billing method, replacing any other one.
    pub fn select(&self, method: BillingMethod) -> CoreResult<Self> {
        self.ensure_open()?;

        if self.billing_method == Some(method) {
            return Err(CoreError::AlreadySelected(method));
        }

        Ok(SelectionState {
            billing_method: Some(method),
            province: None,
            clinic: None,
            needs_attention: true,
            ..self.clone()
        })
    }

    /// Clears the current billing method.
    pub fn deselect(&self, method: BillingMethod) -> CoreResult<Self> {
        self.ensure_open()?;

        if self.billing_method != Some(method) {
            return Err(CoreError::NotSelected(method));
        }

        Ok(SelectionState {
            billing_method: None,
            province: None,
            clinic: None,
            needs_attention: false,
            ..self.clone()
        })
    }

    /// Checkbox adapter: `checked` selects, unchecked deselects.
    pub fn toggle(&self, method: BillingMethod, checked: bool) -> CoreResult<Self> {
        if checked {
            self.select(method)
        } else {
            self.deselect(method)
        }
    }

    /// Chooses the province; the clinic has to be picked again.
    pub fn choose_province(&self, province: &str) -> CoreResult<Self> {
        let province = validate_selection("province", province)?;

        if self.billing_method.is_none() {
            return Err(CoreError::NoBillingMethod);
        }

        Ok(SelectionState {
            province: Some(province),
            clinic: None,
            needs_attention: true,
            ..self.clone()
        })
    }

    /// Chooses the clinic.
    ///
    /// Callers resolve the clinic against the lookup tables *first* and only
    /// apply this transition on a hit, so a miss leaves the clinic unset.
    pub fn choose_clinic(&self, clinic: &str) -> CoreResult<Self> {
        let clinic = validate_selection("clinic", clinic)?;

        if self.billing_method.is_none() {
            return Err(CoreError::NoBillingMethod);
        }
        if self.province.is_none() {
            return Err(CoreError::NoProvince);
        }

        Ok(SelectionState {
            clinic: Some(clinic),
            needs_attention: false,
            ..self.clone()
        })
    }

    /// Records the patient ID for a program found in the cart.
    ///
    /// `program` is the raw tag as scanned.
    pub fn set_patient_id(&self, program: &str, id: &str) -> CoreResult<Self> {
        let id = normalize_patient_id(id);
        let tag = ProgramTag::new(program);

        if !self.patient_ids.contains_key(&tag) {
            return Err(CoreError::UnknownProgram(program.to_string()));
        }

        let mut next = self.clone();
        next.patient_ids.insert(tag, id);
        Ok(next)
    }

    /// Records delivery instructions exactly as typed.
    pub fn set_delivery_instructions(&self, text: &str) -> Self {
        SelectionState {
            delivery_instructions: text.to_string(),
            ..self.clone()
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        match self.access {
            BillingAccess::Open => Ok(()),
            BillingAccess::LockedToClinic => Err(CoreError::BillingLocked),
            BillingAccess::Unavailable => Err(CoreError::BillingUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::types::CartLine;

    fn open_state() -> SelectionState {
        SelectionState::for_cart(&scan(&[CartLine::tagged("SUP-1", "ICN/HOMEPHARMA")]))
    }

    #[test]
    fn test_initial_state_for_clinic_billing_cart() {
        let state = open_state();
        assert_eq!(state.access(), BillingAccess::Open);
        assert_eq!(state.billing_method(), None);
        assert!(state.needs_attention());
    }

    #[test]
    fn test_initial_state_for_medication_cart() {
        let state = SelectionState::for_cart(&scan(&[CartLine::tagged("MED", "ICN/HOMEPHARMA")]));
        assert_eq!(state.access(), BillingAccess::LockedToClinic);
        assert_eq!(state.billing_method(), Some(BillingMethod::InfusionClinic));
        assert!(state.needs_attention());
        assert_eq!(
            state.select(BillingMethod::HomePharma),
            Err(CoreError::BillingLocked)
        );
        assert_eq!(
            state.deselect(BillingMethod::InfusionClinic),
            Err(CoreError::BillingLocked)
        );
    }

    #[test]
    fn test_program_only_cart_has_no_billing_choice() {
        let state = SelectionState::for_cart(&scan(&[CartLine::tagged(
            "X",
            "opdivo-yervoy-regimen-and-opdualag",
        )]));
        assert_eq!(state.access(), BillingAccess::Unavailable);
        assert!(!state.needs_attention());
        assert_eq!(
            state.select(BillingMethod::InfusionClinic),
            Err(CoreError::BillingUnavailable)
        );
    }

    #[test]
    fn test_select_is_mutually_exclusive() {
        let state = open_state()
            .select(BillingMethod::HomePharma)
            .unwrap()
            .choose_province("Ontario")
            .unwrap()
            .select(BillingMethod::InfusionClinic)
            .unwrap();

        assert_eq!(state.billing_method(), Some(BillingMethod::InfusionClinic));
        assert_eq!(state.province(), None);
        assert_eq!(state.clinic(), None);
        assert!(state.needs_attention());
    }

    #[test]
    fn test_select_same_method_twice_is_rejected() {
        let state = open_state().select(BillingMethod::HomePharma).unwrap();
        assert_eq!(
            state.select(BillingMethod::HomePharma),
            Err(CoreError::AlreadySelected(BillingMethod::HomePharma))
        );
    }

    #[test]
    fn test_deselect_returns_to_no_billing() {
        let state = open_state()
            .select(BillingMethod::InfusionClinic)
            .unwrap()
            .choose_province("Alberta")
            .unwrap()
            .deselect(BillingMethod::InfusionClinic)
            .unwrap();

        assert_eq!(state.billing_method(), None);
        assert_eq!(state.province(), None);
        assert!(!state.needs_attention());
    }

    #[test]
    fn test_deselect_other_method_is_rejected() {
        let state = open_state().select(BillingMethod::InfusionClinic).unwrap();
        assert_eq!(
            state.deselect(BillingMethod::HomePharma),
            Err(CoreError::NotSelected(BillingMethod::HomePharma))
        );
    }

    #[test]
    fn test_toggle_maps_to_select_and_deselect() {
        let state = open_state().toggle(BillingMethod::HomePharma, true).unwrap();
        assert_eq!(state.billing_method(), Some(BillingMethod::HomePharma));
        let state = state.toggle(BillingMethod::HomePharma, false).unwrap();
        assert_eq!(state.billing_method(), None);
    }

    #[test]
    fn test_province_requires_billing_method() {
        assert_eq!(
            open_state().choose_province("Ontario"),
            Err(CoreError::NoBillingMethod)
        );
    }

    #[test]
    fn test_clinic_requires_province() {
        let state = open_state().select(BillingMethod::HomePharma).unwrap();
        assert_eq!(state.choose_clinic("Clinic A"), Err(CoreError::NoProvince));
    }

    #[test]
    fn test_attention_flag_follows_choices() {
        let state = open_state()
            .select(BillingMethod::InfusionClinic)
            .unwrap()
            .choose_province("Ontario")
            .unwrap();
        assert!(state.needs_attention());
        assert!(state.is_address_pending());

        let state = state.choose_clinic("Downtown Infusion").unwrap();
        assert!(!state.needs_attention());
        assert!(!state.is_address_pending());
        assert_eq!(
            state.completed_selection(),
            Some((BillingMethod::InfusionClinic, "Ontario", "Downtown Infusion"))
        );

        let state = state.choose_province("Quebec").unwrap();
        assert!(state.needs_attention());
        assert_eq!(state.clinic(), None);
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let original = open_state();
        let _ = original.select(BillingMethod::HomePharma).unwrap();
        assert_eq!(original, open_state());
    }

    #[test]
    fn test_patient_ids() {
        let scan = scan(&[
            CartLine::tagged("A", "sanofi-hemophilia-alprolix-eloctate"),
            CartLine::tagged("B", "keytruda-support"),
        ]);
        let state = SelectionState::for_cart(&scan)
            .set_patient_id("keytruda-support", " K-77 ")
            .unwrap();

        let tag = ProgramTag::new("keytruda-support");
        assert_eq!(state.patient_id(&tag), Some("K-77"));
        assert_eq!(state.patient_ids().len(), 2);

        assert_eq!(
            state.set_patient_id("Hemophilia", "123"),
            Err(CoreError::UnknownProgram("Hemophilia".to_string()))
        );
    }

    #[test]
    fn test_delivery_instructions() {
        let state = open_state().set_delivery_instructions("Ring the back door");
        assert_eq!(state.delivery_instructions(), "Ring the back door");

        let long_text = "x".repeat(2_000);
        let state = state.set_delivery_instructions(&long_text);
        assert_eq!(state.delivery_instructions(), long_text);
    }

    #[test]
    fn test_long_patient_id_is_kept() {
        let state = SelectionState::for_cart(&scan(&[CartLine::tagged("S", "keytruda")]));
        let long_id = "9".repeat(65);

        let state = state.set_patient_id("keytruda", &long_id).unwrap();
        assert_eq!(state.patient_id(&ProgramTag::new("keytruda")), Some(long_id.as_str()));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Step {
            Select(BillingMethod),
            Deselect(BillingMethod),
            Province(&'static str),
            Clinic(&'static str),
        }

        fn method() -> impl Strategy<Value = BillingMethod> {
            prop_oneof![Just(BillingMethod::HomePharma), Just(BillingMethod::InfusionClinic)]
        }

        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                method().prop_map(Step::Select),
                method().prop_map(Step::Deselect),
                prop_oneof![Just("Ontario"), Just("Quebec")].prop_map(Step::Province),
                Just(Step::Clinic("Downtown Infusion")),
            ]
        }

        fn apply(state: &SelectionState, step: &Step) -> CoreResult<SelectionState> {
            match step {
                Step::Select(m) => state.select(*m),
                Step::Deselect(m) => state.deselect(*m),
                Step::Province(p) => state.choose_province(p),
                Step::Clinic(c) => state.choose_clinic(c),
            }
        }

        proptest! {
            #[test]
            fn test_selection_invariants_hold_for_any_sequence(
                steps in prop::collection::vec(step(), 0..24)
            ) {
                let mut state = open_state();

                for step in &steps {
                    let before = state.clone();
                    match apply(&state, step) {
                        Ok(next) => state = next,
                        Err(_) => {
                            prop_assert_eq!(&state, &before);
                            continue;
                        }
                    }

                    if let Step::Select(m) = step {
                        prop_assert_eq!(state.billing_method(), Some(*m));
                        prop_assert_eq!(state.province(), None);
                        prop_assert_eq!(state.clinic(), None);
                    }
                    if let Step::Deselect(_) = step {
                        prop_assert_eq!(state.billing_method(), None);
                    }

                    prop_assert!(state.clinic().is_none() || state.province().is_some());
                    prop_assert!(state.province().is_none() || state.billing_method().is_some());
                    prop_assert_eq!(state.needs_attention(), state.is_address_pending());
                }
            }
        }
    }
}
