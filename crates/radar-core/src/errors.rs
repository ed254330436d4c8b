//! Error taxonomy shared by every radar crate.
//!
//! Operations never panic across the public surface; they return a
//! `RadarError`, which can be flattened into a serializable [`ErrorReport`]
//! carrying a machine-readable [`ErrorCode`] for callers on the other side of
//! a process or language boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::enums::EntityKind;

/// Errors raised by radar operations. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum RadarError {
    /// The submitted entry failed validation. Carries every violation found.
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    /// The operation referenced an unknown entity.
    #[error("Entity not found: {entity} {id}")]
    NotFound { entity: EntityKind, id: String },

    /// Optimistic version check failed; refetch and retry.
    #[error("Version conflict on {entity} {id}: expected version {expected}, found {actual}")]
    Conflict {
        entity: EntityKind,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Computed dates are out of order. Indicates a misconfiguration.
    #[error("Scheduling inconsistency: {0}")]
    SchedulingInconsistency(String),

    /// A lifecycle transition that the state machine does not allow.
    #[error("Invalid state transition: {entity} {id} from {from} to {to}")]
    InvalidTransition {
        entity: EntityKind,
        id: String,
        from: String,
        to: String,
    },

    /// Backing-store failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RadarError {
    /// Build a `NotFound` error.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Build a `Validation` error from a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }

    /// Machine-readable classification of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::SchedulingInconsistency(_) => ErrorCode::SchedulingInconsistency,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Other(_) => ErrorCode::Storage,
        }
    }

    /// Whether the caller can recover by correcting input or retrying.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SchedulingInconsistency(_) | Self::Other(_))
    }

    /// Flatten into a serializable report.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        let details = match self {
            Self::Validation { errors } => errors.clone(),
            _ => Vec::new(),
        };
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            details,
        }
    }
}

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    SchedulingInconsistency,
    InvalidTransition,
    Storage,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::SchedulingInconsistency => "scheduling_inconsistency",
            Self::InvalidTransition => "invalid_transition",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error result for callers that cannot receive a Rust error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    /// Individual violations, populated for validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}
