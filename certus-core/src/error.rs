//! Error types for CERTUS operations

use crate::{FilterConditionOperator, Resource};
use thiserror::Error;

/// Catalog and platform-enum fetch errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog request for {resource} failed with status {status}: {message}")]
    RequestFailed {
        resource: Resource,
        status: u16,
        message: String,
    },

    #[error("Catalog transport error for {resource}: {reason}")]
    Transport { resource: Resource, reason: String },

    #[error("Invalid catalog response for {resource}: {reason}")]
    InvalidResponse { resource: Resource, reason: String },

    #[error("Catalog client setup failed: {reason}")]
    ClientSetup { reason: String },

    #[error("Platform enum dictionary unavailable: {reason}")]
    EnumsUnavailable { reason: String },
}

/// Condition item validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Operator {operator} is not allowed on field {field}")]
    OperatorNotAllowed {
        field: String,
        operator: FilterConditionOperator,
    },

    #[error("Operator {operator} on field {field} takes no value")]
    UnexpectedValue {
        field: String,
        operator: FilterConditionOperator,
    },

    #[error("Operator {operator} on field {field} requires a value")]
    MissingValue {
        field: String,
        operator: FilterConditionOperator,
    },

    #[error("Field {field} accepts a single value, got {count}")]
    TooManyValues { field: String, count: usize },

    #[error("Value {value} is not one of the allowed values of field {field}")]
    ValueNotAllowed { field: String, value: String },

    #[error("Invalid pattern for field {field}: {reason}")]
    InvalidPattern { field: String, reason: String },
}

/// Master error type for all CERTUS errors.
#[derive(Debug, Clone, Error)]
pub enum CertusError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for CERTUS operations.
pub type CertusResult<T> = Result<T, CertusError>;

// =============================================================================
// TESTS
// =============================================================================
