//! # Validation Module
//!
//! Checks applied to dropdown and free-text values before they enter the
//! selection state.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field                  Rule                                            │
//! │  ─────────────────────  ──────────────────────────────────────────────  │
//! │  province / clinic      non-empty after trim                            │
//! │  patient ID             trimmed, any length                             │
//! │  delivery instructions  passed through unchanged                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a dropdown selection and returns it trimmed.
///
/// ## Example
/// ```rust
/// use billing_core::validation::validate_selection;
///
/// assert_eq!(validate_selection("province", " Ontario ").unwrap(), "Ontario");
/// assert!(validate_selection("clinic", "   ").is_err());
/// ```
pub fn validate_selection(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Normalizes a patient ID.
///
/// Surrounding whitespace is dropped; length is not limited and an empty
/// ID is accepted (clearing the field clears the attribute).
pub fn normalize_patient_id(id: &str) -> String {
    id.trim().to_string()
}
