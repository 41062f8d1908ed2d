//! Lookup errors for the static form tables.

use thiserror::Error;

/// An identifier did not name a known table entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormsError {
    /// Not one of the six transaction types.
    #[error("unknown transaction type: \"{0}\"")]
    UnknownTransactionType(String),

    /// Not one of the data-collection categories.
    #[error("unknown data category: \"{0}\"")]
    UnknownCategory(String),

    /// Not in the form catalogue.
    #[error("unknown form: \"{0}\"")]
    UnknownForm(String),
}
