//! Error types for the admin module registry.
//!
//! Only structural problems are errors. Unknown ids and denied access are
//! reported through `false` and empty results by the registry itself.

use thiserror::Error;

/// Label used when a module is rejected before its id is known.
pub const UNNAMED_MODULE: &str = "<unnamed>";

/// A module failed structural validation. Raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("module '{module}': {field} must not be empty")]
    EmptyField {
        module: String,
        field: &'static str,
    },

    #[error("module '{module}': missing required field '{field}'")]
    MissingField {
        module: String,
        field: &'static str,
    },

    #[error("module '{module}': {field} must be {expected}")]
    InvalidType {
        module: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("module id '{0}' appears more than once")]
    DuplicateId(String),
}

impl ValidationError {
    /// Static code for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyField { .. } => "empty_field",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidType { .. } => "invalid_type",
            Self::DuplicateId(_) => "duplicate_id",
        }
    }

    /// Id of the offending module (or [`UNNAMED_MODULE`]).
    pub fn module(&self) -> &str {
        match self {
            Self::EmptyField { module, .. }
            | Self::MissingField { module, .. }
            | Self::InvalidType { module, .. } => module,
            Self::DuplicateId(id) => id,
        }
    }
}
