//! Contract error types for the repository engine
//!
//! There is no "not found" variant. Absence, including rows hidden by the
//! tenant or soft-delete stages, is reported as `Ok(None)` / `Ok(false)`.

use sea_orm::DbErr;
use std::fmt;

/// Repository failures that always reach the caller
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The caller supplied something the engine cannot act on
    #[error("Validation error on {entity}: {message}")]
    Validation {
        /// Table of the entity involved
        entity: String,
        /// Validation error message
        message: String,
    },

    /// The entity's capability declaration is inconsistent
    #[error("Invalid capability declaration for {entity}: {message}")]
    Capability {
        /// Table of the entity involved
        entity: String,
        /// What is wrong with the declaration
        message: String,
    },

    /// Failure surfaced by the persistence driver, passed through unmodified
    #[error(transparent)]
    Driver(#[from] DbErr),
}

/// Category of a [`RepositoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Capability,
    Driver,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Capability => write!(f, "capability"),
            Self::Driver => write!(f, "driver"),
        }
    }
}

impl RepositoryError {
    pub fn validation(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            entity: entity.into(),
            message: message.into(),
        }
    }

    pub fn capability(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Capability {
            entity: entity.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Capability { .. } => ErrorKind::Capability,
            Self::Driver(_) => ErrorKind::Driver,
        }
    }

    /// Whether this is a caller error rather than an infrastructure one
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
