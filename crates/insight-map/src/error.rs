//! Error types for mapping operations.

use std::fmt;

/// Errors from mapping operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A role pattern failed to compile.
    InvalidPattern {
        role: String,
        pattern: String,
        message: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern {
                role,
                pattern,
                message,
            } => write!(f, "Invalid pattern '{pattern}' for role {role}: {message}"),
        }
    }
}

impl std::error::Error for MappingError {}
