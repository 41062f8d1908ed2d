//! # Error Types
//!
//! Validation errors raised when user input or backend rows fail the
//! structural rules the domain types enforce.

use thiserror::Error;

/// Validation failure for a domain primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// CEA registration number does not match `R123456A` (letter, six digits, letter).
    #[error("invalid CEA registration number: \"{0}\" (expected a letter, six digits and a letter, e.g. R123456A)")]
    InvalidLicenseNumber(String),

    /// Role string is not one of the known roles.
    #[error("unknown role: \"{0}\"")]
    UnknownRole(String),

    /// CPD category string is not valid for the framework in effect.
    #[error("invalid CPD category: \"{0}\"")]
    InvalidCategory(String),

    /// Prescribed-essential topic is not recognised.
    #[error("invalid prescribed essential topic: \"{0}\"")]
    InvalidTopic(String),

    /// Identifier could not be parsed.
    #[error("invalid identifier \"{value}\": {reason}")]
    InvalidIdentifier {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
