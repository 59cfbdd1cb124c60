//! Error taxonomy for the projection pipeline.

use std::fmt;

/// Failure raised by the portfolio generator or the projection pipeline.
///
/// All checks run before any derived value is produced, so an error
/// always means no partial result was returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A parameter or asset record is outside its allowed range.
    Validation {
        /// Dotted field path (e.g. `"economics.om_cost_ratio"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
    /// A year outside the analysis window was requested.
    Domain {
        year: i32,
        start_year: i32,
        end_year: i32,
    },
    /// A computation would divide by zero or produce a non-finite value.
    Arithmetic { message: String },
}

impl ProjectionError {
    /// Shorthand for a [`ProjectionError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`ProjectionError::Arithmetic`].
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic {
            message: message.into(),
        }
    }

    /// Returns the offending field path for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "validation error: {field}: {message}")
            }
            Self::Domain {
                year,
                start_year,
                end_year,
            } => write!(
                f,
                "domain error: year {year} is outside the analysis window {start_year}..={end_year}"
            ),
            Self::Arithmetic { message } => write!(f, "arithmetic error: {message}"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Returns the first error of a list of validation failures, if any.
pub(crate) fn first_error(errors: Vec<ProjectionError>) -> Result<(), ProjectionError> {
    match errors.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
