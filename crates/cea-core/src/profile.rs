//! # Agent Profiles
//!
//! The dashboard shows one combined profile per agent, assembled from three
//! backend sources: the authenticated user, the optional `user_profiles`
//! row, and the optional active license.

use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::license::{License, LicenseStatus};
use crate::numeric::null_as_default;
use crate::role::Role;

/// Registration number shown when no active license exists.
pub const NO_REGISTRATION: &str = "Not Available";

/// Identity returned by the backend's auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Backend user id.
    pub id: UserId,
    /// Sign-in email.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// A row of the `user_profiles` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Owner.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Mobile number.
    #[serde(default)]
    pub mobile: Option<String>,
    /// Role string as stored.
    #[serde(default)]
    pub role: Option<String>,
}

/// Combined profile rendered on the dashboard and cached as a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user id.
    pub id: UserId,
    /// Sign-in email.
    pub email: String,
    /// Display name, `"User"` when unknown.
    pub name: String,
    /// Mobile number, empty when unknown.
    pub mobile: String,
    /// Greeting name: display name, else the email's local part.
    pub user_name: String,
    /// CEA registration number, [`NO_REGISTRATION`] without a license.
    pub cea_registration_number: String,
    /// Role within the agency.
    pub role: Role,
    /// License status.
    pub status: LicenseStatus,
    /// Last known CPD compliance flag.
    pub cpd_compliance_status: bool,
    /// Active licenses (zero or one).
    pub cea_licenses: Vec<License>,
}

impl UserProfile {
    /// Combine the three backend sources into a profile.
    ///
    /// Empty strings are treated like missing values. An unparseable role
    /// falls back to [`Role::Agent`].
    pub fn combine(
        user: &AuthUser,
        profile: Option<&ProfileRow>,
        license: Option<License>,
        cpd_compliance_status: bool,
    ) -> Self {
        let name = profile
            .and_then(|p| non_empty(p.name.as_deref()))
            .map(str::to_string);
        let mobile = profile
            .and_then(|p| non_empty(p.mobile.as_deref()))
            .unwrap_or_default()
            .to_string();
        let role = profile
            .and_then(|p| p.role.as_deref())
            .and_then(|r| r.parse().ok())
            .unwrap_or_default();
        let local_part = user.email.split('@').next().unwrap_or_default().to_string();

        Self {
            id: user.id,
            email: user.email.clone(),
            user_name: name.clone().unwrap_or(local_part),
            name: name.unwrap_or_else(|| "User".to_string()),
            mobile,
            cea_registration_number: license
                .as_ref()
                .and_then(|l| non_empty(Some(l.license_number.as_str())))
                .unwrap_or(NO_REGISTRATION)
                .to_string(),
            role,
            status: license
                .as_ref()
                .map_or(LicenseStatus::Active, |l| l.status),
            cpd_compliance_status,
            cea_licenses: license.into_iter().collect(),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LicenseNumber;

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::new(),
            email: "tan.ah.kow@agency.sg".to_string(),
        }
    }

    fn license(user: &AuthUser) -> License {
        License {
            license_id: None,
            user_id: user.id,
            license_number: LicenseNumber::from_stored("R123456A"),
            status: LicenseStatus::Active,
            valid_from: None,
            valid_until: None,
        }
    }

    #[test]
    fn combines_all_sources() {
        let u = user();
        let row = ProfileRow {
            user_id: Some(u.id),
            name: Some("Tan Ah Kow".into()),
            mobile: Some("+65 9123 4567".into()),
            role: Some("keo".into()),
        };
        let p = UserProfile::combine(&u, Some(&row), Some(license(&u)), true);
        assert_eq!(p.name, "Tan Ah Kow");
        assert_eq!(p.user_name, "Tan Ah Kow");
        assert_eq!(p.mobile, "+65 9123 4567");
        assert_eq!(p.role, Role::Keo);
        assert_eq!(p.cea_registration_number, "R123456A");
        assert_eq!(p.cea_licenses.len(), 1);
        assert!(p.cpd_compliance_status);
    }

    #[test]
    fn falls_back_without_profile_or_license() {
        let u = user();
        let p = UserProfile::combine(&u, None, None, false);
        assert_eq!(p.name, "User");
        assert_eq!(p.user_name, "tan.ah.kow");
        assert_eq!(p.mobile, "");
        assert_eq!(p.role, Role::Agent);
        assert_eq!(p.cea_registration_number, NO_REGISTRATION);
        assert_eq!(p.status, LicenseStatus::Active);
        assert!(p.cea_licenses.is_empty());
    }

    #[test]
    fn empty_name_is_treated_as_missing() {
        let u = user();
        let row = ProfileRow {
            name: Some("  ".into()),
            ..ProfileRow::default()
        };
        let p = UserProfile::combine(&u, Some(&row), None, false);
        assert_eq!(p.name, "User");
        assert_eq!(p.user_name, "tan.ah.kow");
    }

    #[test]
    fn unknown_role_defaults_to_agent() {
        let u = user();
        let row = ProfileRow {
            role: Some("director".into()),
            ..ProfileRow::default()
        };
        let p = UserProfile::combine(&u, Some(&row), None, false);
        assert_eq!(p.role, Role::Agent);
    }

    #[test]
    fn null_email_reads_as_empty() {
        let u: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "email": null
        }))
        .unwrap();
        assert_eq!(u.email, "");
        assert_eq!(UserProfile::combine(&u, None, None, false).user_name, "");
    }

    #[test]
    fn snapshot_round_trips() {
        let u = user();
        let p = UserProfile::combine(&u, None, Some(license(&u)), true);
        let json = serde_json::to_string(&p).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
