//! # CEA Licenses
//!
//! A license row as stored by the backend, and the gate that decides whether
//! it entitles its holder to sign in on a given day.
//!
//! ## States
//!
//! ```text
//! Active ──(validity window lapses / regulator action)──▶ Expired
//! ```
//!
//! The backend owns the transition; this module only reads the state. A
//! license is usable on day `d` when its status is `Active` and `d` falls in
//! its validity window. Missing window bounds are open-ended.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::{LicenseNumber, UserId};

// ─── License Status ──────────────────────────────────────────────────

/// Status column of a license row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseStatus {
    /// License is in force.
    Active,
    /// License has lapsed.
    Expired,
    /// Forward-compatible catch-all for statuses added by the backend.
    #[serde(other)]
    Unknown,
}

impl LicenseStatus {
    /// The exact string the backend stores for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Why a license does not permit sign-in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseGateError {
    /// The status column is not `Active`.
    #[error("license status is {status}")]
    NotActive {
        /// Stored status.
        status: LicenseStatus,
    },

    /// The validity window has not started.
    #[error("license is not valid until {from}")]
    NotYetValid {
        /// First valid day.
        from: NaiveDate,
    },

    /// The validity window has ended.
    #[error("license lapsed on {until}")]
    Lapsed {
        /// Last valid day.
        until: NaiveDate,
    },
}

// ─── License ─────────────────────────────────────────────────────────

/// A CEA license row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Row identifier, when the backend returns one.
    #[serde(default)]
    pub license_id: Option<Uuid>,
    /// The holder.
    pub user_id: UserId,
    /// CEA registration number.
    pub license_number: LicenseNumber,
    /// Current status.
    pub status: LicenseStatus,
    /// First day of validity.
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    /// Last day of validity.
    #[serde(default, alias = "expiry_date")]
    pub valid_until: Option<NaiveDate>,
}

impl License {
    /// Check that the license permits sign-in on `today`.
    pub fn check_valid_on(&self, today: NaiveDate) -> Result<(), LicenseGateError> {
        if self.status != LicenseStatus::Active {
            return Err(LicenseGateError::NotActive {
                status: self.status,
            });
        }
        if let Some(from) = self.valid_from {
            if today < from {
                return Err(LicenseGateError::NotYetValid { from });
            }
        }
        if let Some(until) = self.valid_until {
            if today > until {
                return Err(LicenseGateError::Lapsed { until });
            }
        }
        Ok(())
    }

    /// Whether the license permits sign-in on `today`.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.check_valid_on(today).is_ok()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn license(status: LicenseStatus) -> License {
        License {
            license_id: None,
            user_id: UserId::new(),
            license_number: LicenseNumber::from_stored("R123456A"),
            status,
            valid_from: Some(day(2025, 1, 1)),
            valid_until: Some(day(2025, 12, 31)),
        }
    }

    #[test]
    fn active_inside_window_is_valid() {
        assert!(license(LicenseStatus::Active).is_valid_on(day(2025, 6, 1)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let lic = license(LicenseStatus::Active);
        assert!(lic.is_valid_on(day(2025, 1, 1)));
        assert!(lic.is_valid_on(day(2025, 12, 31)));
    }

    #[test]
    fn expired_status_is_rejected() {
        let err = license(LicenseStatus::Expired)
            .check_valid_on(day(2025, 6, 1))
            .unwrap_err();
        assert_eq!(
            err,
            LicenseGateError::NotActive {
                status: LicenseStatus::Expired
            }
        );
    }

    #[test]
    fn lapsed_window_is_rejected() {
        let err = license(LicenseStatus::Active)
            .check_valid_on(day(2026, 1, 1))
            .unwrap_err();
        assert_eq!(err, LicenseGateError::Lapsed { until: day(2025, 12, 31) });
    }

    #[test]
    fn future_window_is_rejected() {
        let err = license(LicenseStatus::Active)
            .check_valid_on(day(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, LicenseGateError::NotYetValid { .. }));
    }

    #[test]
    fn open_window_is_valid() {
        let mut lic = license(LicenseStatus::Active);
        lic.valid_from = None;
        lic.valid_until = None;
        assert!(lic.is_valid_on(day(2099, 1, 1)));
    }

    #[test]
    fn deserializes_backend_row() {
        let json = serde_json::json!({
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "license_number": "R123456A",
            "status": "Active",
            "expiry_date": "2026-03-31",
            "issuing_office": "ignored"
        });
        let lic: License = serde_json::from_value(json).unwrap();
        assert_eq!(lic.status, LicenseStatus::Active);
        assert_eq!(lic.valid_until, Some(day(2026, 3, 31)));
        assert!(lic.valid_from.is_none());
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let s: LicenseStatus = serde_json::from_str("\"Suspended\"").unwrap();
        assert_eq!(s, LicenseStatus::Unknown);
    }
}
