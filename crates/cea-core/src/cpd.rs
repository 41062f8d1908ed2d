//! # CPD Records
//!
//! Continuing Professional Development records as stored in the backend's
//! `cpd_records` table.
//!
//! Categories differ by framework. The 2026 framework uses three fixed
//! categories ([`CpdCategory`]); legacy rows carry free-form category
//! strings, so the record keeps the raw string and [`CpdRecord::category`]
//! resolves it on demand.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{RecordId, UserId};
use crate::numeric::{null_as_default, value_or_zero, LenientNumber};

/// Stored status of a CPD record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CpdStatus {
    /// Course completed; counts toward compliance.
    Completed,
    /// Registered but not completed.
    #[serde(alias = "In Progress", alias = "InProgress")]
    Registered,
    /// Forward-compatible catch-all.
    #[serde(other)]
    Unknown,
}

/// A 2026-framework CPD category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CpdCategory {
    /// Structured learning, Prescribed Essentials.
    #[serde(rename = "Structured_Learning_PE")]
    PrescribedEssentials,
    /// Structured learning, Professional Competencies.
    #[serde(rename = "Structured_Learning_PC")]
    ProfessionalCompetencies,
    /// Self-directed learning (Generic Competencies Plus). Needs KEO approval.
    #[serde(rename = "Self_Directed_Learning_GC_Plus")]
    SelfDirectedLearning,
}

impl CpdCategory {
    /// All categories in display order.
    pub const ALL: [CpdCategory; 3] = [
        Self::PrescribedEssentials,
        Self::ProfessionalCompetencies,
        Self::SelfDirectedLearning,
    ];

    /// The string stored in `cpd_category`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrescribedEssentials => "Structured_Learning_PE",
            Self::ProfessionalCompetencies => "Structured_Learning_PC",
            Self::SelfDirectedLearning => "Self_Directed_Learning_GC_Plus",
        }
    }

    /// Short key used in compliance breakdowns.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PrescribedEssentials => "pe",
            Self::ProfessionalCompetencies => "pc",
            Self::SelfDirectedLearning => "sdl",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PrescribedEssentials => "Prescribed Essentials",
            Self::ProfessionalCompetencies => "Professional Competencies",
            Self::SelfDirectedLearning => "Self-Directed Learning",
        }
    }

    /// Whether records in this category wait for KEO approval.
    pub fn requires_keo_approval(&self) -> bool {
        matches!(self, Self::SelfDirectedLearning)
    }
}

impl FromStr for CpdCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory(s.to_string()))
    }
}

impl std::fmt::Display for CpdCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic of a Prescribed Essentials course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrescribedEssentialTopic {
    /// Prevention of Money Laundering, Proliferation Financing and Terrorism Financing.
    #[serde(rename = "PMLPFTF")]
    Pmlpftf,
    /// Any other prescribed topic.
    Other,
}

impl PrescribedEssentialTopic {
    /// The string stored in `prescribed_essential_topic`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pmlpftf => "PMLPFTF",
            Self::Other => "Other",
        }
    }
}

impl FromStr for PrescribedEssentialTopic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PMLPFTF" => Ok(Self::Pmlpftf),
            "Other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidTopic(s.to_string())),
        }
    }
}

/// A row of the `cpd_records` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpdRecord {
    /// Row identifier.
    #[serde(default)]
    pub cpd_id: Option<RecordId>,
    /// Owner of the record.
    pub user_id: UserId,
    /// Course title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_name: String,
    /// Training provider.
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_provider: String,
    /// Day the course was completed.
    pub completion_date: NaiveDate,
    /// Compliance year the record counts toward.
    pub compliance_year: i32,
    /// Record status.
    pub status: CpdStatus,
    /// Raw category string.
    #[serde(default)]
    pub cpd_category: Option<String>,
    /// Training hours (2026 framework).
    #[serde(default)]
    pub training_hours: Option<LenientNumber>,
    /// CPD credits (legacy framework).
    #[serde(default)]
    pub cpd_credits: Option<LenientNumber>,
    /// Certificate number.
    #[serde(default)]
    pub certificate_number: Option<String>,
    /// Certificate URL.
    #[serde(default)]
    pub certificate_url: Option<String>,
    /// Topic for Prescribed Essentials courses.
    #[serde(default)]
    pub prescribed_essential_topic: Option<String>,
    /// KEO approval flag for self-directed learning.
    #[serde(default)]
    pub keo_approved: Option<bool>,
}

impl CpdRecord {
    /// The 2026-framework category, if the stored string names one.
    pub fn category(&self) -> Option<CpdCategory> {
        self.cpd_category.as_deref().and_then(|s| s.parse().ok())
    }

    /// Whether the raw category string contains `needle`.
    pub fn category_contains(&self, needle: &str) -> bool {
        self.cpd_category
            .as_deref()
            .is_some_and(|c| c.contains(needle))
    }

    /// Training hours, 0 when missing or non-numeric.
    pub fn hours(&self) -> f64 {
        value_or_zero(self.training_hours.as_ref())
    }

    /// CPD credits, 0 when missing or non-numeric.
    pub fn credits(&self) -> f64 {
        value_or_zero(self.cpd_credits.as_ref())
    }

    /// Whether the record is completed.
    pub fn is_completed(&self) -> bool {
        self.status == CpdStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(extra: serde_json::Value) -> CpdRecord {
        let mut base = json!({
            "cpd_id": "6f1c1a6e-2f0d-4b8e-9d55-3f9f2b3a2c11",
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "course_name": "AML Essentials",
            "course_provider": "CEA Academy",
            "completion_date": "2026-02-14",
            "compliance_year": 2026,
            "status": "Completed"
        });
        if let (Some(b), Some(e)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in e {
                b.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn category_resolves_known_strings() {
        let r = row(json!({"cpd_category": "Structured_Learning_PE"}));
        assert_eq!(r.category(), Some(CpdCategory::PrescribedEssentials));
    }

    #[test]
    fn legacy_category_is_kept_raw() {
        let r = row(json!({"cpd_category": "Professional Competencies"}));
        assert_eq!(r.category(), None);
        assert!(r.category_contains("Professional"));
        assert!(!r.category_contains("Generic"));
    }

    #[test]
    fn numeric_fields_are_lenient() {
        let r = row(json!({"training_hours": "3.5", "cpd_credits": null}));
        assert_eq!(r.hours(), 3.5);
        assert_eq!(r.credits(), 0.0);
    }

    #[test]
    fn missing_optional_fields_default() {
        let r = row(json!({}));
        assert!(r.cpd_category.is_none());
        assert_eq!(r.hours(), 0.0);
        assert!(r.keo_approved.is_none());
        assert!(r.is_completed());
    }

    #[test]
    fn null_text_columns_are_tolerated() {
        let r = row(json!({"course_name": null, "course_provider": null}));
        assert_eq!(r.course_name, "");
        assert_eq!(r.course_provider, "");
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let r = row(json!({"status": "Withdrawn"}));
        assert_eq!(r.status, CpdStatus::Unknown);
        assert!(!r.is_completed());
    }

    #[test]
    fn category_round_trips_through_str() {
        for c in CpdCategory::ALL {
            assert_eq!(c.as_str().parse::<CpdCategory>().unwrap(), c);
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn only_sdl_needs_keo_approval() {
        assert!(CpdCategory::SelfDirectedLearning.requires_keo_approval());
        assert!(!CpdCategory::PrescribedEssentials.requires_keo_approval());
        assert!(!CpdCategory::ProfessionalCompetencies.requires_keo_approval());
    }

    #[test]
    fn topic_parses() {
        assert_eq!("PMLPFTF".parse::<PrescribedEssentialTopic>().unwrap(), PrescribedEssentialTopic::Pmlpftf);
        assert!("AML".parse::<PrescribedEssentialTopic>().is_err());
    }
}
