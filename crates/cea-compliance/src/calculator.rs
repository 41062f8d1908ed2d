//! # Compliance Calculator
//!
//! Evaluates one person's completed CPD records for one compliance year.
//!
//! ## Rule Sets
//!
//! - **Legacy** (before [`FRAMEWORK_CUTOFF_YEAR`]): credits are summed across
//!   all records; compliant when the sum reaches
//!   [`LEGACY_REQUIRED_CREDITS`]. The breakdown counts courses by category
//!   keyword and is informational only.
//! - **2026**: hours are summed per [`CpdCategory`]; compliant when every
//!   category meets its minimum and the three together reach
//!   [`COMPONENTS_REQUIRED_HOURS`].
//!
//! Numeric fields are read leniently; anything that does not resolve to a
//! finite number counts as zero.
//!
//! [`FRAMEWORK_CUTOFF_YEAR`]: crate::framework::FRAMEWORK_CUTOFF_YEAR

use serde::{Deserialize, Serialize};

use cea_core::{CpdCategory, CpdRecord, RecordId};

use crate::approval::is_pending_keo_approval;
use crate::framework::{
    minimum_hours, Framework, Unit, COMPONENTS_REQUIRED_HOURS, LEGACY_GENERIC_COURSES,
    LEGACY_PROFESSIONAL_COURSES, LEGACY_REQUIRED_CREDITS,
};

/// Progress of one breakdown component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProgress {
    /// Stable key (`pe`, `pc`, `sdl`, `professional`, `generic`).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Amount completed.
    pub completed: f64,
    /// Amount required.
    pub required: f64,
    /// Unit of `completed` and `required`.
    pub unit: Unit,
    /// Whether `completed >= required`.
    pub met: bool,
}

impl ComponentProgress {
    fn new(key: &str, label: &str, completed: f64, required: f64, unit: Unit) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            completed,
            required,
            unit,
            met: completed >= required,
        }
    }
}

/// Result of evaluating a year of CPD records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Compliance year evaluated.
    pub year: i32,
    /// Rule set applied.
    pub framework: Framework,
    /// Unit of the totals.
    pub unit: Unit,
    /// Total completed, in `unit`.
    pub total_completed: f64,
    /// Total required, in `unit`.
    pub required_total: f64,
    /// Per-component progress.
    pub breakdown: Vec<ComponentProgress>,
    /// Overall compliance.
    pub compliant: bool,
    /// Number of records that went into the totals.
    pub records_counted: usize,
    /// Self-directed records still waiting for KEO approval. They are
    /// included in the totals.
    pub pending_keo_approval: Vec<RecordId>,
}

impl ComplianceReport {
    /// Look up a breakdown component by key.
    pub fn component(&self, key: &str) -> Option<&ComponentProgress> {
        self.breakdown.iter().find(|c| c.key == key)
    }
}

/// Keep only completed records belonging to `year`.
pub fn filter_for_year(year: i32, records: &[CpdRecord]) -> Vec<CpdRecord> {
    records
        .iter()
        .filter(|r| r.compliance_year == year && r.is_completed())
        .cloned()
        .collect()
}

/// Evaluate `records` under the framework in effect for `year`.
///
/// Records are expected to be pre-filtered to completed records of `year`
/// (the backend query does this; see [`filter_for_year`] otherwise).
pub fn evaluate(year: i32, records: &[CpdRecord]) -> ComplianceReport {
    let framework = Framework::for_year(year);
    let pending_keo_approval = records
        .iter()
        .filter(|r| is_pending_keo_approval(r))
        .filter_map(|r| r.cpd_id)
        .collect();

    let (total_completed, breakdown, compliant) = match framework {
        Framework::Legacy => evaluate_legacy(records),
        Framework::Components2026 => evaluate_components(records),
    };

    tracing::debug!(
        year,
        framework = framework.label(),
        total_completed,
        compliant,
        "evaluated CPD compliance"
    );

    ComplianceReport {
        year,
        framework,
        unit: framework.unit(),
        total_completed,
        required_total: framework.required_total(),
        breakdown,
        compliant,
        records_counted: records.len(),
        pending_keo_approval,
    }
}

fn evaluate_legacy(records: &[CpdRecord]) -> (f64, Vec<ComponentProgress>, bool) {
    let credits: f64 = records.iter().map(CpdRecord::credits).sum();
    let professional = records
        .iter()
        .filter(|r| r.category_contains("Professional"))
        .count() as f64;
    let generic = records
        .iter()
        .filter(|r| r.category_contains("Generic"))
        .count() as f64;

    let breakdown = vec![
        ComponentProgress::new(
            "professional",
            "Professional Competencies",
            professional,
            LEGACY_PROFESSIONAL_COURSES,
            Unit::Courses,
        ),
        ComponentProgress::new(
            "generic",
            "Generic Competencies",
            generic,
            LEGACY_GENERIC_COURSES,
            Unit::Courses,
        ),
    ];
    (credits, breakdown, credits >= LEGACY_REQUIRED_CREDITS)
}

fn evaluate_components(records: &[CpdRecord]) -> (f64, Vec<ComponentProgress>, bool) {
    let breakdown: Vec<ComponentProgress> = CpdCategory::ALL
        .into_iter()
        .map(|category| {
            let hours: f64 = records
                .iter()
                .filter(|r| r.category() == Some(category))
                .map(CpdRecord::hours)
                .sum();
            ComponentProgress::new(
                category.key(),
                category.label(),
                hours,
                minimum_hours(category),
                Unit::Hours,
            )
        })
        .collect();

    let total: f64 = breakdown.iter().map(|c| c.completed).sum();
    let compliant = breakdown.iter().all(|c| c.met) && total >= COMPONENTS_REQUIRED_HOURS;
    (total, breakdown, compliant)
}
