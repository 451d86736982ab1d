//! # Shopper Events
//!
//! Discrete UI inputs, in the shape the host-side renderer sends them.
//!
//! ```json
//! { "type": "toggleBilling", "method": "infusionClinic", "checked": true }
//! { "type": "chooseProvince", "province": "Ontario" }
//! { "type": "chooseClinic", "clinic": "Downtown Infusion Clinic" }
//! { "type": "enterPatientId", "program": "sanofi-hemophilia-alprolix-eloctate", "patientId": "H-1" }
//! { "type": "enterDeliveryInstructions", "text": "Side door" }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use billing_core::BillingMethod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CheckoutEvent {
    /// A billing checkbox changed.
    ToggleBilling { method: BillingMethod, checked: bool },

    ChooseProvince { province: String },

    ChooseClinic { clinic: String },

    /// `program` is the raw tag reported in the PSS panel.
    EnterPatientId {
        program: String,
        #[serde(rename = "patientId")]
        patient_id: String,
    },

    EnterDeliveryInstructions { text: String },
}

impl CheckoutEvent {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::ToggleBilling { .. } => "toggleBilling",
            CheckoutEvent::ChooseProvince { .. } => "chooseProvince",
            CheckoutEvent::ChooseClinic { .. } => "chooseClinic",
            CheckoutEvent::EnterPatientId { .. } => "enterPatientId",
            CheckoutEvent::EnterDeliveryInstructions { .. } => "enterDeliveryInstructions",
        }
    }
}
