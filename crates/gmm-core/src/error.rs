//! Errors raised while building or emitting module metadata.

use thiserror::Error;

/// Structural problems found in a module before it is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("module declares no variants")]
    NoVariants,

    #[error("duplicate variant name '{name}'")]
    DuplicateVariant { name: String },

    #[error("variant '{variant}' has no 'org.gradle.usage' attribute")]
    MissingUsage { variant: String },

    #[error("variant '{variant}' declares dependency '{coordinate}' more than once")]
    DuplicateDependency { variant: String, coordinate: String },

    #[error("required field '{field}' is empty")]
    EmptyField { field: String },
}

#[derive(Error, Debug)]
pub enum GmmError {
    #[error("Invalid module metadata: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to serialize module metadata: {message}")]
    Serialization { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GmmError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Serialization {
            message: format!("required field '{}' is absent", field.into()),
        }
    }

    /// Whether this error was raised by model validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, GmmError>;
