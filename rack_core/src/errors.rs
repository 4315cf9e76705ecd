//! # Error Types
//!
//! Structured error types for rack_core. Every variant carries enough context
//! for a caller (human, script or HTTP layer) to tell which field or file was
//! at fault without parsing the message.
//!
//! Only genuinely invalid requests become errors. An infeasible building, a
//! missed pallet target or missing site data are reported inside the result
//! records as notes and warnings instead.
//!
//! ## Example
//!
//! ```rust
//! use rack_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_ft: f64) -> CalcResult<()> {
//!     if width_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "widthFt",
//!             width_ft.to_string(),
//!             "Building width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rack_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for layout, BOM and compliance operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unparseable, non-finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An enumerated value is not one of the recognized variants
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: String,
        value: String,
        expected: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Engine configuration is internally inconsistent
    #[error("Invalid configuration '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// An external site-data source failed (network, upstream, malformed data)
    #[error("Site lookup failed for '{query}': {reason}")]
    LookupFailed { query: String, reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownVariant error
    pub fn unknown_variant(kind: impl Into<String>, value: impl Into<String>, expected: &[&str]) -> Self {
        CalcError::UnknownVariant {
            kind: kind.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a LookupFailed error
    pub fn lookup_failed(query: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::LookupFailed {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. } | CalcError::LookupFailed { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidConfig { .. } => "INVALID_CONFIG",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::LookupFailed { .. } => "LOOKUP_FAILED",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}

/// Require a finite, strictly positive value.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive number",
        ));
    }
    Ok(())
}

/// Require a finite value that is zero or greater.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be zero or greater",
        ));
    }
    Ok(())
}

/// Multiply two quantities; overflow is an input error on `field`.
pub(crate) fn qty_mul(field: &str, a: u32, b: u32) -> CalcResult<u32> {
    a.checked_mul(b).ok_or_else(|| quantity_overflow(field, format!("{} x {}", a, b)))
}

/// Add two quantities; overflow is an input error on `field`.
pub(crate) fn qty_add(field: &str, a: u32, b: u32) -> CalcResult<u32> {
    a.checked_add(b).ok_or_else(|| quantity_overflow(field, format!("{} + {}", a, b)))
}

fn quantity_overflow(field: &str, value: String) -> CalcError {
    CalcError::invalid_input(field, value, "Quantity exceeds the supported range")
}
