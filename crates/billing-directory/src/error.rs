//! # Directory Error Types
//!
//! Failures while loading or checking the clinic tables.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source          Variant                                                │
//! │  ──────────────  ────────────────────────────────────────────────────   │
//! │  file system     Io { path, source }                                   │
//! │  JSON            Parse                                                 │
//! │  data checks     UnknownProvince, IncompleteRecord, EmptyProvinceList  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The data file could not be read.
    #[error("Failed to read clinic directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data is not valid JSON of the expected shape.
    #[error("Invalid clinic directory JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The province display-name table is empty.
    #[error("Clinic directory lists no provinces")]
    EmptyProvinceList,

    /// A clinic table is keyed by a province missing from the province list.
    #[error("{table} table references unknown province '{province}'")]
    UnknownProvince { table: String, province: String },

    /// A clinic record has a blank field.
    #[error("{table} clinic '{clinic}' in {province} has no {field}")]
    IncompleteRecord {
        table: String,
        province: String,
        clinic: String,
        field: String,
    },
}
