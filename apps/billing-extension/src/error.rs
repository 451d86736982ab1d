//! # Extension Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shopper event                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Illegal transition? ── CoreError ──────────┐                           │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  Host call failed? ──── HostError ──► ExtensionError ──► caller         │
//! │       │                                      ▲            (logged at    │
//! │       ▼                                      │             error level) │
//! │  Startup: config / directory ── ConfigError, DirectoryError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

use billing_core::CoreError;
use billing_directory::DirectoryError;

use crate::config::ConfigError;
use crate::host::HostError;

#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The event was not legal in the current selection state.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The checkout host rejected or failed a mutation.
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fixture file for the replay tool could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtensionError {
    /// True when the error came from the checkout host rather than from
    /// the shopper's input.
    pub fn is_host_failure(&self) -> bool {
        matches!(self, ExtensionError::Host(_))
    }
}

pub type ExtensionResult<T> = Result<T, ExtensionError>;
