//! # CPD Record Entry
//!
//! Turns the "Add CPD Record" form into a row ready for insertion into
//! `cpd_records`. The compliance year is the calendar year of the
//! completion date, and that year's framework decides which fields apply:
//!
//! | Framework | Amount field | Category | Extras |
//! |-----------|--------------|----------|--------|
//! | 2026 | `training_hours` (required) | one of the three, required | PE topic for PE, `keo_approved = false` for SDL |
//! | Legacy | `cpd_credits` (required) | free text, optional | none |
//!
//! All problems are collected and reported together, one per field.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use cea_core::numeric::leading_float;
use cea_core::{CpdCategory, CpdStatus, LenientNumber, PrescribedEssentialTopic, UserId};

use crate::framework::Framework;

/// Raw input of the record-entry form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpdEntryInput {
    pub course_name: String,
    pub course_provider: String,
    /// ISO date, `YYYY-MM-DD`.
    pub completion_date: String,
    pub cpd_category: Option<String>,
    pub training_hours: Option<LenientNumber>,
    pub cpd_credits: Option<LenientNumber>,
    pub certificate_number: Option<String>,
    pub certificate_url: Option<String>,
    pub prescribed_essential_topic: Option<String>,
}

/// A validated row for `cpd_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCpdRecord {
    pub user_id: UserId,
    pub course_name: String,
    pub course_provider: String,
    pub completion_date: NaiveDate,
    pub compliance_year: i32,
    pub status: CpdStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpd_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpd_credits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescribed_essential_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keo_approved: Option<bool>,
}

impl NewCpdRecord {
    /// Framework the record was shaped for.
    pub fn framework(&self) -> Framework {
        Framework::for_year(self.compliance_year)
    }
}

/// A problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Record entry failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordEntryError {
    /// One or more fields are missing or malformed.
    #[error("invalid CPD record: {}", summarize(.0))]
    Invalid(Vec<FieldIssue>),
}

impl RecordEntryError {
    /// The individual field problems.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Invalid(issues) => issues,
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `input` and shape it into a row owned by `user_id`.
pub fn build_record(user_id: UserId, input: &CpdEntryInput) -> Result<NewCpdRecord, RecordEntryError> {
    let mut issues = Vec::new();

    let course_name = required_text(&mut issues, "course_name", &input.course_name);
    let course_provider = required_text(&mut issues, "course_provider", &input.course_provider);

    let completion_date = match input.completion_date.trim() {
        "" => {
            issues.push(FieldIssue::new("completion_date", "This field is required"));
            None
        }
        raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                issues.push(FieldIssue::new("completion_date", "must be a date in YYYY-MM-DD form"));
                None
            }
        },
    };

    let certificate_url = optional_text(input.certificate_url.as_deref());
    if let Some(raw) = certificate_url.as_deref() {
        match url::Url::parse(raw) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            _ => issues.push(FieldIssue::new("certificate_url", "must be an http(s) URL")),
        }
    }

    // Without a date there is no framework to shape the remaining fields by.
    let Some(completion_date) = completion_date else {
        return Err(RecordEntryError::Invalid(issues));
    };
    let compliance_year = completion_date.year();

    let mut record = NewCpdRecord {
        user_id,
        course_name,
        course_provider,
        completion_date,
        compliance_year,
        status: CpdStatus::Completed,
        cpd_category: None,
        training_hours: None,
        cpd_credits: None,
        certificate_number: optional_text(input.certificate_number.as_deref()),
        certificate_url,
        prescribed_essential_topic: None,
        keo_approved: None,
    };

    match Framework::for_year(compliance_year) {
        Framework::Components2026 => {
            record.training_hours = amount(&mut issues, "training_hours", input.training_hours.as_ref());
            match optional_text(input.cpd_category.as_deref()) {
                None => issues.push(FieldIssue::new("cpd_category", "This field is required")),
                Some(raw) => match raw.parse::<CpdCategory>() {
                    Ok(category) => {
                        record.cpd_category = Some(category.as_str().to_string());
                        apply_category_extras(&mut issues, &mut record, category, input);
                    }
                    Err(e) => issues.push(FieldIssue::new("cpd_category", e.to_string())),
                },
            }
        }
        Framework::Legacy => {
            record.cpd_credits = amount(&mut issues, "cpd_credits", input.cpd_credits.as_ref());
            record.cpd_category = optional_text(input.cpd_category.as_deref());
        }
    }

    if issues.is_empty() {
        Ok(record)
    } else {
        Err(RecordEntryError::Invalid(issues))
    }
}

fn apply_category_extras(
    issues: &mut Vec<FieldIssue>,
    record: &mut NewCpdRecord,
    category: CpdCategory,
    input: &CpdEntryInput,
) {
    match category {
        CpdCategory::PrescribedEssentials => {
            match optional_text(input.prescribed_essential_topic.as_deref()) {
                None => issues.push(FieldIssue::new("prescribed_essential_topic", "This field is required")),
                Some(raw) => match raw.parse::<PrescribedEssentialTopic>() {
                    Ok(topic) => record.prescribed_essential_topic = Some(topic.as_str().to_string()),
                    Err(e) => issues.push(FieldIssue::new("prescribed_essential_topic", e.to_string())),
                },
            }
        }
        CpdCategory::SelfDirectedLearning => record.keo_approved = Some(false),
        CpdCategory::ProfessionalCompetencies => {}
    }
}

fn required_text(issues: &mut Vec<FieldIssue>, field: &str, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        issues.push(FieldIssue::new(field, "This field is required"));
    }
    trimmed.to_string()
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// A required, non-negative amount. Unlike stored rows, entry input must be
/// numeric; trailing units on strings are still accepted.
fn amount(issues: &mut Vec<FieldIssue>, field: &str, raw: Option<&LenientNumber>) -> Option<f64> {
    let value = match raw.map(LenientNumber::raw) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, "This field is required"));
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            issues.push(FieldIssue::new(field, "This field is required"));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => leading_float(s),
        Some(_) => None,
    };
    match value {
        None => {
            issues.push(FieldIssue::new(field, "must be a number"));
            None
        }
        Some(v) if v < 0.0 => {
            issues.push(FieldIssue::new(field, "must not be negative"));
            None
        }
        Some(v) => Some(v),
    }
}
