//! # Checkout Session
//!
//! One mounted instance of the billing block. Owns the only
//! `SelectionState`, swaps it for the value each transition returns, and
//! issues host calls for resolved choices.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  mount(cart lines) ──► scan once ──► SelectionState::for_cart           │
//! │                                            │                            │
//! │           ┌────────────────────────────────┘                            │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   event    ┌────────────────────┐                  │
//! │  │  current state  │ ─────────► │ transition (pure)  │                  │
//! │  │                 │ ◄───────── │ Ok(new) / Err      │                  │
//! │  └─────────────────┘   commit   └────────────────────┘                  │
//! │           │                                                             │
//! │           │ clinic resolved / free text entered                         │
//! │           ▼                                                             │
//! │  host.apply(mutation) … awaited in order, failures logged + returned    │
//! │                                                                         │
//! │  Dropped with the checkout; nothing is persisted here.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is not re-scanned if the host changes it after mount.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use billing_core::resolver::{delivery_instructions_mutation, patient_id_mutation};
use billing_core::{
    resolve, AddressPlan, BillingMethod, CartLine, CartScan, CheckoutMutation, CheckoutView,
    ClinicCatalog, CoreError, ProgramTag, SelectionState,
};
use billing_directory::ClinicDirectory;

use crate::error::ExtensionResult;
use crate::event::CheckoutEvent;
use crate::host::CheckoutHost;

/// Result of a clinic choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClinicOutcome {
    /// Found in the tables; state updated and host calls issued.
    Resolved(AddressPlan),
    /// Not listed for the province; nothing changed.
    NotFound,
}

pub struct CheckoutSession<H> {
    id: Uuid,
    scan: CartScan,
    state: SelectionState,
    directory: Arc<ClinicDirectory>,
    host: H,
}

impl<H: CheckoutHost> CheckoutSession<H> {
    /// Scans the cart and builds the initial state.
    pub fn mount(lines: &[CartLine], directory: Arc<ClinicDirectory>, host: H) -> Self {
        let id = Uuid::new_v4();
        let scan = billing_core::scan(lines);
        let state = SelectionState::for_cart(&scan);

        info!(
            session = %id,
            lines = lines.len(),
            requires_clinic_billing = scan.requires_clinic_billing,
            has_medication = scan.has_medication,
            programs = scan.programs.len(),
            "Billing block mounted"
        );

        CheckoutSession {
            id,
            scan,
            state,
            directory,
            host,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scan(&self) -> &CartScan {
        &self.scan
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Projects the current control tree.
    pub fn view(&self) -> CheckoutView {
        CheckoutView::project(&self.scan, &self.state, self.directory.as_ref())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Routes one shopper event.
    pub async fn dispatch(&mut self, event: CheckoutEvent) -> ExtensionResult<()> {
        debug!(session = %self.id, event = event.name(), "Dispatching event");

        match event {
            CheckoutEvent::ToggleBilling { method, checked } => self.toggle_billing(method, checked),
            CheckoutEvent::ChooseProvince { province } => self.choose_province(&province),
            CheckoutEvent::ChooseClinic { clinic } => self.choose_clinic(&clinic).await.map(|_| ()),
            CheckoutEvent::EnterPatientId {
                program,
                patient_id,
            } => self.enter_patient_id(&program, &patient_id).await,
            CheckoutEvent::EnterDeliveryInstructions { text } => {
                self.enter_delivery_instructions(&text).await
            }
        }
    }

    /// A billing checkbox changed.
    pub fn toggle_billing(&mut self, method: BillingMethod, checked: bool) -> ExtensionResult<()> {
        let next = self.state.toggle(method, checked).inspect_err(|e| {
            warn!(session = %self.id, %method, checked, error = %e, "Billing toggle rejected");
        })?;

        debug!(session = %self.id, %method, checked, "Billing method changed");
        self.state = next;
        Ok(())
    }

    /// Chooses a province; only names offered by the dropdown are accepted.
    pub fn choose_province(&mut self, province: &str) -> ExtensionResult<()> {
        let next = self
            .state
            .choose_province(province)
            .and_then(|next| {
                let chosen = next.province().unwrap_or_default();
                if self.directory.provinces().iter().any(|p| p == chosen) {
                    Ok(next)
                } else {
                    Err(CoreError::UnknownProvince(chosen.to_string()))
                }
            })
            .inspect_err(|e| {
                warn!(session = %self.id, province, error = %e, "Province choice rejected");
            })?;

        debug!(session = %self.id, province, "Province chosen");
        self.state = next;
        Ok(())
    }

    /// Resolves the clinic and, on a hit, commits it and updates the host.
    ///
    /// The state is committed before the host calls, so a host failure
    /// leaves the clinic chosen; the failure is logged and returned.
    pub async fn choose_clinic(&mut self, clinic: &str) -> ExtensionResult<ClinicOutcome> {
        let next = self.state.choose_clinic(clinic).inspect_err(|e| {
            warn!(session = %self.id, clinic, error = %e, "Clinic choice rejected");
        })?;

        let (method, province, clinic) = next
            .completed_selection()
            .ok_or(CoreError::NoProvince)?;

        let Some(plan) = resolve(method, province, clinic, self.directory.as_ref()) else {
            warn!(session = %self.id, %method, province, clinic, "Clinic not found in directory");
            return Ok(ClinicOutcome::NotFound);
        };

        info!(session = %self.id, %method, province, clinic, "Clinic resolved");
        self.state = next;

        self.apply_all(&plan.mutations()).await?;
        Ok(ClinicOutcome::Resolved(plan))
    }

    /// Records a patient ID and stores it as a checkout attribute.
    pub async fn enter_patient_id(&mut self, program: &str, patient_id: &str) -> ExtensionResult<()> {
        let next = self.state.set_patient_id(program, patient_id).inspect_err(|e| {
            warn!(session = %self.id, program, error = %e, "Patient ID rejected");
        })?;
        let tag = ProgramTag::new(program);
        let mutation = patient_id_mutation(&tag, next.patient_id(&tag).unwrap_or_default());

        self.state = next;
        self.apply_all(&[mutation]).await
    }

    pub async fn enter_delivery_instructions(&mut self, text: &str) -> ExtensionResult<()> {
        self.state = self.state.set_delivery_instructions(text);
        debug!(session = %self.id, len = text.len(), "Delivery instructions entered");
        self.apply_all(&[delivery_instructions_mutation(text)]).await
    }

    /// Issues mutations in order, stopping at the first failure.
    async fn apply_all(&self, mutations: &[CheckoutMutation]) -> ExtensionResult<()> {
        for mutation in mutations {
            if let Err(e) = self.host.apply(mutation).await {
                error!(
                    session = %self.id,
                    ?mutation,
                    error = %e,
                    "Checkout host failed to apply mutation"
                );
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl<H> CheckoutSession<H> {
    /// Province names offered in the dropdown.
    pub fn provinces(&self) -> Vec<String> {
        self.directory.provinces()
    }
}
