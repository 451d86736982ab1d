//! # billing-directory: Lookup Tables for the Billing Extension
//!
//! Loads the province display-name table and the two clinic tables, and
//! serves them to billing-core through the [`billing_core::ClinicCatalog`]
//! trait.
//!
//! ## Module Organization
//! ```text
//! billing_directory/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── directory.rs    ◄─── ClinicDirectory: load, validate, look up
//! └── error.rs        ◄─── DirectoryError
//! ```
//!
//! ## Usage
//! ```rust
//! use billing_core::{BillingMethod, ClinicCatalog};
//! use billing_directory::ClinicDirectory;
//!
//! let directory = ClinicDirectory::bundled().unwrap();
//! let clinics = directory.clinic_names(BillingMethod::InfusionClinic, "Ontario");
//! assert!(!clinics.is_empty());
//! ```

pub mod directory;
pub mod error;

pub use directory::{ClinicDirectory, ClinicTable};
pub use error::{DirectoryError, DirectoryResult};
