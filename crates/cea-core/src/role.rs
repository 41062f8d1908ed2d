//! # Agent Roles
//!
//! Roles within an estate agency, ordered by privilege.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Role of a user within the agency.
///
/// The `Ord` derivation follows declaration order:
/// `Agent < TeamLeader < Keo < Admin`, so access checks are a single `>=`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Salesperson registered under the agency.
    #[default]
    Agent,
    /// Leads a team of agents.
    TeamLeader,
    /// Key Executive Officer; approves self-directed learning claims.
    Keo,
    /// Agency administrator.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::TeamLeader => "team_leader",
            Self::Keo => "keo",
            Self::Admin => "admin",
        }
    }

    /// Whether this role is at least `minimum`.
    pub fn at_least(&self, minimum: Role) -> bool {
        *self >= minimum
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "agent" | "salesperson" => Ok(Self::Agent),
            "team_leader" => Ok(Self::TeamLeader),
            "keo" => Ok(Self::Keo),
            "admin" => Ok(Self::Admin),
            _ => Err(ValidationError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_order() {
        assert!(Role::Admin > Role::Keo);
        assert!(Role::Keo > Role::TeamLeader);
        assert!(Role::TeamLeader > Role::Agent);
        assert!(Role::Keo.at_least(Role::Keo));
        assert!(!Role::TeamLeader.at_least(Role::Keo));
    }

    #[test]
    fn parse_accepts_loose_spellings() {
        assert_eq!("Team Leader".parse::<Role>().unwrap(), Role::TeamLeader);
        assert_eq!("team-leader".parse::<Role>().unwrap(), Role::TeamLeader);
        assert_eq!("KEO".parse::<Role>().unwrap(), Role::Keo);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Role::TeamLeader).unwrap(), "\"team_leader\"");
        let r: Role = serde_json::from_str("\"keo\"").unwrap();
        assert_eq!(r, Role::Keo);
    }
}
