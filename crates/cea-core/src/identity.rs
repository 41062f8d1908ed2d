//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers the agent desk passes around.
//! You cannot pass a `RecordId` where a `UserId` is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Identifier of an authenticated backend user (the agent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Identifier of a CPD record row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

/// CEA registration number as printed on the agent's license card.
///
/// Deserialization accepts whatever the backend stores; use
/// [`LicenseNumber::parse`] for user input that must be well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseNumber(String);

impl UserId {
    /// Generate a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Uuid>()
            .map(Self)
            .map_err(|e| ValidationError::InvalidIdentifier {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Uuid>()
            .map(Self)
            .map_err(|e| ValidationError::InvalidIdentifier {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LicenseNumber {
    /// Parse a registration number typed by a user.
    ///
    /// Surrounding whitespace is trimmed and letters are upper-cased before
    /// the `R123456A` shape check.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if is_registration_shape(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(ValidationError::InvalidLicenseNumber(raw.to_string()))
        }
    }

    /// Wrap a value read from the backend without checking its shape.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Whether the stored value matches the registration number shape.
    pub fn is_well_formed(&self) -> bool {
        is_registration_shape(&self.0)
    }

    /// Borrow the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_registration_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 8
        && bytes[0].is_ascii_uppercase()
        && bytes[1..7].iter().all(u8::is_ascii_digit)
        && bytes[7].is_ascii_uppercase()
}
