//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Record errors name the variant key and the offending field so the
//!   caller can point at the exact spot in the case document.
//! - Writing fails rather than emit a record that would not reload.
//! - Nothing in this crate recovers from a record error. An unknown key or a
//!   missing parameter aborts reconstruction; substituting a different
//!   objective would silently change the optimization result.

use thiserror::Error;

/// Failure to write a compliance formulation as a record, or to
/// reconstruct one from its record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The record's `key` does not name any registered variant.
    #[error("unknown compliance variant key: {key:?}")]
    UnknownVariantKey {
        /// The key as it appeared in the record.
        key: String,
    },

    /// A parameter declared by the matched variant is absent.
    #[error("compliance variant {variant_key:?} is missing parameter {field:?}")]
    MissingParameter {
        /// Key of the matched variant.
        variant_key: &'static str,
        /// Name of the absent parameter.
        field: &'static str,
    },

    /// A declared parameter is present but is not a number.
    #[error("compliance variant {variant_key:?} has invalid parameter {field:?}: {reason}")]
    InvalidParameter {
        /// Key of the matched variant.
        variant_key: &'static str,
        /// Name of the offending parameter.
        field: &'static str,
        /// What was found instead of a number.
        reason: String,
    },

    /// A parameter is NaN or infinite, which JSON cannot carry. Raised when
    /// writing, so a record that could not be reloaded is never produced.
    #[error("compliance variant {variant_key:?} parameter {field:?} is not finite ({value})")]
    NonFiniteParameter {
        /// Key of the variant being written.
        variant_key: &'static str,
        /// Name of the offending parameter.
        field: &'static str,
        /// The non-finite value.
        value: f64,
    },

    /// The record has no string `key` field.
    #[error("compliance record has no string \"key\" field")]
    MissingKey,

    /// The record, or its `parameters` field, is not a JSON object.
    #[error("malformed compliance record: {reason}")]
    MalformedRecord {
        /// Description of the structural problem.
        reason: String,
    },
}

/// Failure to load or render an optimizer configuration block.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The embedded compliance record could not be reconstructed.
    #[error("compliance error: {0}")]
    Record(#[from] RecordError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
