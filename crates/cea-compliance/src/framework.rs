//! # CPD Frameworks
//!
//! The rule set in effect for a compliance year and its fixed thresholds.

use serde::{Deserialize, Serialize};

use cea_core::CpdCategory;

/// First compliance year evaluated under the multi-component framework.
pub const FRAMEWORK_CUTOFF_YEAR: i32 = 2026;

/// Credits required per year under the legacy framework.
pub const LEGACY_REQUIRED_CREDITS: f64 = 6.0;

/// Professional-competency courses expected under the legacy framework.
pub const LEGACY_PROFESSIONAL_COURSES: f64 = 4.0;

/// Generic-competency courses expected under the legacy framework.
pub const LEGACY_GENERIC_COURSES: f64 = 2.0;

/// Total training hours required per year under the 2026 framework.
pub const COMPONENTS_REQUIRED_HOURS: f64 = 16.0;

/// CPD rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    /// Credits-based rule set before the cutoff year.
    #[serde(rename = "legacy")]
    Legacy,
    /// Hours-based rule set with per-category minimums.
    #[serde(rename = "2026")]
    Components2026,
}

/// Unit a quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Training hours.
    Hours,
    /// CPD credits.
    Credits,
    /// Number of courses.
    Courses,
}

impl Unit {
    /// Plural noun for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Credits => "credits",
            Self::Courses => "courses",
        }
    }
}

impl Framework {
    /// The framework in effect for `year`.
    pub fn for_year(year: i32) -> Self {
        if year >= FRAMEWORK_CUTOFF_YEAR {
            Self::Components2026
        } else {
            Self::Legacy
        }
    }

    /// Unit of the overall total.
    pub fn unit(&self) -> Unit {
        match self {
            Self::Legacy => Unit::Credits,
            Self::Components2026 => Unit::Hours,
        }
    }

    /// Overall amount required for the year.
    pub fn required_total(&self) -> f64 {
        match self {
            Self::Legacy => LEGACY_REQUIRED_CREDITS,
            Self::Components2026 => COMPONENTS_REQUIRED_HOURS,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Legacy => "Legacy Framework",
            Self::Components2026 => "2026 Framework",
        }
    }
}

/// Minimum hours for a category under the 2026 framework.
pub fn minimum_hours(category: CpdCategory) -> f64 {
    match category {
        CpdCategory::PrescribedEssentials => 4.0,
        CpdCategory::ProfessionalCompetencies => 8.0,
        CpdCategory::SelfDirectedLearning => 4.0,
    }
}
