//! # billing-core: Pure Decision Logic for the Checkout Billing Extension
//!
//! Everything the billing block decides, expressed as pure functions over
//! plain values. The extension runtime feeds it cart lines and shopper
//! events and turns its answers into host calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Billing Extension                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Checkout Host (JavaScript)                   │   │
//! │  │     cart lines ──►            ◄── attribute / address changes   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               billing-extension (CheckoutSession)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ billing-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  scanner  │  │ selection │  │ resolver  │  │   view    │  │   │
//! │  │   │ CartScan  │  │ Selection │  │ Address   │  │ Checkout  │  │   │
//! │  │   │           │  │ State     │  │ Plan      │  │ View      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │          billing-directory (ClinicCatalog implementation)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart lines, billing methods, addresses, host change records
//! - [`programs`] - PSS program tags and their display names
//! - [`scanner`] - One-shot cart scan
//! - [`selection`] - Immutable selection state and its transitions
//! - [`resolver`] - Clinic lookup seam and address plans
//! - [`view`] - Derived flags and the rendered control tree
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billing_core::{scan, BillingMethod, CartLine, SelectionState};
//!
//! let lines = vec![CartLine::tagged("SUP-1", "ICN/HOMEPHARMA")];
//! let cart = scan(&lines);
//! assert!(cart.requires_clinic_billing);
//!
//! let state = SelectionState::for_cart(&cart)
//!     .select(BillingMethod::InfusionClinic)
//!     .and_then(|s| s.choose_province("Ontario"))
//!     .unwrap();
//! assert!(state.needs_attention());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod programs;
pub mod resolver;
pub mod scanner;
pub mod selection;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use programs::ProgramTag;
pub use resolver::{resolve, AddressPlan, ClinicCatalog};
pub use scanner::{scan, CartScan};
pub use selection::{BillingAccess, SelectionState};
pub use types::*;
pub use view::{CheckoutView, DerivedFlags};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Cart line attribute carrying billing and program tags.
pub const TAG_ATTRIBUTE_KEY: &str = "tag";

/// Tag values that put an order on clinic / home-pharma billing.
pub const CLINIC_BILLING_TAGS: &[&str] = &["ICN/HOMEPHARMA", "Management"];

/// SKU marking a medication line.
pub const MEDICATION_SKU: &str = "MED";

/// Checkout attribute recording the chosen clinic or pharmacy account.
pub const ACCOUNT_ATTRIBUTE_KEY: &str = "ICN/HOME PHARMA Account";

/// Checkout attribute holding free-text delivery instructions.
pub const DELIVERY_INSTRUCTIONS_ATTRIBUTE_KEY: &str = "Delivery Instructions:";

/// All clinic addresses are Canadian.
pub const SHIPPING_COUNTRY_CODE: &str = "CA";
