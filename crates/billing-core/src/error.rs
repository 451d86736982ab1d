//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  ├── CoreError        - Illegal selection transitions                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  billing-directory errors (separate crate)                             │
//! │  └── DirectoryError   - Clinic table loading failures                  │
//! │                                                                         │
//! │  billing-extension errors (app)                                        │
//! │  ├── HostError        - Checkout host rejected a mutation              │
//! │  └── ExtensionError   - What the session caller sees                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ExtensionError → host console     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A clinic lookup miss is deliberately NOT an error: the resolver returns
//! `None` and the session treats it as a silent no-op.

use thiserror::Error;

use crate::types::BillingMethod;

// =============================================================================
// Core Error
// =============================================================================

/// Selection state machine errors.
///
/// Every variant is returned *instead of* a new state; the previous
/// `SelectionState` is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The method is already the selected billing method.
    #[error("{0} billing is already selected")]
    AlreadySelected(BillingMethod),

    /// Tried to deselect a method that is not the current one.
    #[error("{0} billing is not selected")]
    NotSelected(BillingMethod),

    /// A province or clinic was chosen before any billing method.
    #[error("Select a billing method before choosing a province")]
    NoBillingMethod,

    /// A clinic was chosen before a province.
    #[error("Select a province before choosing a clinic")]
    NoProvince,

    /// Medication orders are always clinic-billed.
    ///
    /// ## When This Occurs
    /// - Cart has a clinic-billing line with the medication SKU
    /// - The checkboxes are hidden, but an event still tried to toggle them
    #[error("Billing method is fixed to Infusion Clinic for medication orders")]
    BillingLocked,

    /// The cart carries no clinic-billing tag, so no method can be chosen.
    #[error("This cart does not offer clinic billing")]
    BillingUnavailable,

    /// Province is not one of the dropdown options.
    #[error("Unknown province: {0}")]
    UnknownProvince(String),

    /// Patient ID entered for a program that is not in the cart.
    #[error("Program not in cart: {0}")]
    UnknownProgram(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for dropdown values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::AlreadySelected(BillingMethod::HomePharma);
        assert_eq!(err.to_string(), "Home Pharma billing is already selected");

        let err = CoreError::UnknownProgram("Hemophilia".to_string());
        assert_eq!(err.to_string(), "Program not in cart: Hemophilia");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "province".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: province is required");
    }
}
