//! # Domain Types
//!
//! Types shared by the scanner, the selection state machine and the resolver.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  From the host (read-only)          To the host (change records)        │
//! │  ┌─────────────────┐                ┌────────────────────────┐          │
//! │  │    CartLine     │                │    CheckoutMutation    │          │
//! │  │  ─────────────  │                │  ────────────────────  │          │
//! │  │  merchandise    │                │  UpdateAttribute       │          │
//! │  │    .sku         │                │  UpdateShippingAddress │          │
//! │  │  attributes[]   │                └───────────┬────────────┘          │
//! │  └─────────────────┘                            │                       │
//! │                                                 ▼                       │
//! │  From the data tables               ┌────────────────────────┐          │
//! │  ┌─────────────────┐                │    MailingAddress      │          │
//! │  │  ClinicRecord   │ ─────────────► │  company, address1/2,  │          │
//! │  │  Address, City  │                │  city, provinceCode,   │          │
//! │  │  Province, ...  │                │  countryCode, zip, ... │          │
//! │  └─────────────────┘                └────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::SHIPPING_COUNTRY_CODE;

// =============================================================================
// Cart Lines
// =============================================================================

/// A key/value attribute attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The merchandise a cart line points at. Only the SKU matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Merchandise {
    #[serde(default)]
    #[ts(optional)]
    pub sku: Option<String>,
}

/// One line of the checkout cart, as supplied by the host.
///
/// Lines with no attributes are valid; they simply carry no signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    #[serde(default)]
    pub merchandise: Merchandise,

    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl CartLine {
    /// Creates a line with the given SKU and attributes.
    pub fn new(sku: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        CartLine {
            merchandise: Merchandise {
                sku: Some(sku.into()),
            },
            attributes,
        }
    }

    /// Convenience for the common single-`tag` line.
    pub fn tagged(sku: impl Into<String>, tag: impl Into<String>) -> Self {
        CartLine::new(sku, vec![Attribute::new(crate::TAG_ATTRIBUTE_KEY, tag)])
    }

    /// Returns the SKU, if the merchandise has one.
    pub fn sku(&self) -> Option<&str> {
        self.merchandise.sku.as_deref()
    }

    /// Iterates the values of every `tag` attribute on this line.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.key == crate::TAG_ATTRIBUTE_KEY)
            .map(|a| a.value.as_str())
    }
}

// =============================================================================
// Billing Method
// =============================================================================

/// Who the order is billed to, and therefore where it ships.
///
/// "No method chosen" is `Option::<BillingMethod>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum BillingMethod {
    /// Billed to a home-pharmacy account; ships to the customer's address.
    HomePharma,
    /// Billed to an infusion clinic; ships to the clinic.
    InfusionClinic,
}

impl BillingMethod {
    /// Both methods, in checkbox order.
    pub const ALL: [BillingMethod; 2] = [BillingMethod::HomePharma, BillingMethod::InfusionClinic];

    /// Display label used for checkboxes and the province heading.
    pub fn label(&self) -> &'static str {
        match self {
            BillingMethod::HomePharma => "Home Pharma",
            BillingMethod::InfusionClinic => "Infusion Clinic",
        }
    }

    /// Checkbox id / form value in the rendered tree.
    pub fn control_value(&self) -> &'static str {
        match self {
            BillingMethod::HomePharma => "home-pharma",
            BillingMethod::InfusionClinic => "infusion-clinic",
        }
    }
}

impl std::fmt::Display for BillingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Clinic Record
// =============================================================================

/// One row of a clinic lookup table.
///
/// Field names follow the headings of the externally maintained tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicRecord {
    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "City")]
    pub city: String,

    /// Two-letter province code (e.g. "ON").
    #[serde(rename = "Province")]
    pub province: String,

    #[serde(rename = "Postal Code")]
    pub postal_code: String,

    #[serde(rename = "Phone No.")]
    pub phone: String,
}

// =============================================================================
// Mailing Address
// =============================================================================

/// A shipping address change record.
///
/// Every field is optional so that a partial update (clearing `address2`
/// only) and a full replacement share one type. Absent fields are left
/// untouched by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub province_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub country_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub zip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,

    /// Applies to this order only; never saved to the address book.
    pub one_time_use: bool,
}

impl MailingAddress {
    /// Full one-time-use replacement pointing at a clinic.
    ///
    /// The clinic key becomes the company line so the carrier label names
    /// the clinic.
    pub fn for_clinic(clinic_key: &str, record: &ClinicRecord) -> Self {
        MailingAddress {
            company: Some(clinic_key.to_string()),
            address1: Some(record.address.clone()),
            address2: Some(String::new()),
            city: Some(record.city.clone()),
            province_code: Some(record.province.clone()),
            country_code: Some(SHIPPING_COUNTRY_CODE.to_string()),
            zip: Some(record.postal_code.clone()),
            phone: Some(record.phone.clone()),
            one_time_use: true,
        }
    }

    /// Partial update that only blanks the secondary address line.
    ///
    /// The host ignores an empty `address2`, so a single space is sent.
    pub fn clear_secondary_line() -> Self {
        MailingAddress {
            address2: Some(" ".to_string()),
            one_time_use: true,
            ..Default::default()
        }
    }
}

// =============================================================================
// Checkout Mutation
// =============================================================================

/// A change the extension asks the checkout host to apply.
///
/// ## Wire Shape
/// ```json
/// { "type": "updateAttribute", "key": "ICN/HOME PHARMA Account", "value": "Clinic A" }
/// { "type": "updateShippingAddress", "address": { "address2": " ", "oneTimeUse": true } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CheckoutMutation {
    /// Sets a checkout-level attribute.
    UpdateAttribute { key: String, value: String },
    /// Replaces (or partially updates) the order's shipping address.
    UpdateShippingAddress { address: MailingAddress },
}

impl CheckoutMutation {
    pub fn attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        CheckoutMutation::UpdateAttribute {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn shipping_address(address: MailingAddress) -> Self {
        CheckoutMutation::UpdateShippingAddress { address }
    }
}
