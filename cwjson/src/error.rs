//! Error types for the defensive JSON reader.

use std::fmt;

use crate::KeyPath;

/// Reasons a field could not be read from a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// One of the keys in the sequence does not exist.
    Missing {
        /// The full key sequence that was requested.
        path: KeyPath,
    },
    /// The value exists but has the wrong JSON type.
    TypeMismatch {
        /// The full key sequence that was requested.
        path: KeyPath,
        /// Human readable name of the type the caller asked for.
        expected: &'static str,
        /// JSON type name of the value actually found.
        found: &'static str,
    },
    /// The value has the right shape but cannot be represented.
    OutOfRange {
        /// The full key sequence that was requested.
        path: KeyPath,
        /// The offending value, rendered as JSON.
        value: String,
    },
}

impl FieldError {
    /// Returns `true` if the key sequence was absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldError::Missing { .. })
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing { path } => {
                write!(f, "key sequence {} does not exist", path)
            }
            FieldError::TypeMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "value at {} is of type {}, expected {}",
                    path, found, expected
                )
            }
            FieldError::OutOfRange { path, value } => {
                write!(f, "value {} at {} is out of range", value, path)
            }
        }
    }
}

impl std::error::Error for FieldError {}
