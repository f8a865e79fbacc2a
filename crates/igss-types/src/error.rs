//! Error types for the IGSS data model.

use thiserror::Error;

/// Errors raised while building or mutating the data model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// A dataset must contain at least one example.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A row does not carry one value per attribute.
    #[error("row {row} has {found} values, expected {expected}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Attribute lookup by name or index failed.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A value index or label is outside the attribute's dictionary.
    #[error("unknown value {value:?} for attribute {attribute}")]
    UnknownValue { attribute: String, value: String },

    /// Only one class carries weight, so no prior can be estimated.
    #[error("degenerate class distribution: {0}")]
    DegenerateClasses(String),

    /// Weights must be finite and non-negative.
    #[error("invalid weight {weight} for example {index}")]
    InvalidWeight { index: usize, weight: f64 },

    /// Rule conditions must reference strictly increasing attributes.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// Parallel slices handed to a builder disagree in length.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Result type for data model operations.
pub type TypesResult<T> = Result<T, TypesError>;
