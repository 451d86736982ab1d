//! # PSS Programs
//!
//! Patient-support programs are announced by cart line `tag` attributes.
//! Some tags are internal slugs and get a friendlier display name.
//!
//! ```text
//!   raw tag                                  display name       field / attribute key
//!   ─────────────────────────────────────    ───────────────    ─────────────────────
//!   sanofi-hemophilia-alprolix-eloctate  ──► Hemophilia     ──► HEMOPHILIA
//!   opdivo-yervoy-regimen-and-opdualag   ──► Access to Hope ──► ACCESS TO HOPE
//!   anything-else                        ──► anything-else  ──► ANYTHING-ELSE
//! ```

use serde::{Deserialize, Serialize};

/// Raw tag → display name. Tags not listed display as themselves.
const PROGRAM_RENAMES: &[(&str, &str)] = &[
    ("sanofi-hemophilia-alprolix-eloctate", "Hemophilia"),
    ("opdivo-yervoy-regimen-and-opdualag", "Access to Hope"),
];

/// A program tag found on a cart line.
///
/// Identity (equality, dedup, patient ID keys) is the *raw* tag; two raw
/// tags that happen to share a display name stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramTag(String);

impl ProgramTag {
    pub fn new(raw: impl Into<String>) -> Self {
        ProgramTag(raw.into())
    }

    /// The tag exactly as it appeared on the cart line.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Name shown to the shopper.
    pub fn display_name(&self) -> &str {
        PROGRAM_RENAMES
            .iter()
            .find(|(raw, _)| *raw == self.0)
            .map(|(_, display)| *display)
            .unwrap_or(&self.0)
    }

    /// Value of the read-only program name field.
    pub fn field_value(&self) -> String {
        self.display_name().to_uppercase()
    }

    /// Checkout attribute key under which the patient ID is stored.
    pub fn attribute_key(&self) -> String {
        self.field_value()
    }
}

impl std::fmt::Display for ProgramTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renamed_programs() {
        let tag = ProgramTag::new("sanofi-hemophilia-alprolix-eloctate");
        assert_eq!(tag.display_name(), "Hemophilia");
        assert_eq!(tag.field_value(), "HEMOPHILIA");

        let tag = ProgramTag::new("opdivo-yervoy-regimen-and-opdualag");
        assert_eq!(tag.display_name(), "Access to Hope");
        assert_eq!(tag.attribute_key(), "ACCESS TO HOPE");
    }

    #[test]
    fn test_unknown_program_passes_through() {
        let tag = ProgramTag::new("keytruda-support");
        assert_eq!(tag.display_name(), "keytruda-support");
        assert_eq!(tag.field_value(), "KEYTRUDA-SUPPORT");
        assert_eq!(tag.raw(), "keytruda-support");
    }
}
