//! Progress-bar figures for compliance components.

use serde::{Deserialize, Serialize};

/// Share of required progress at or above which a component is "nearly" done.
pub const NEARLY_THRESHOLD: f64 = 0.7;

/// Colour band of a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// Requirement met.
    Complete,
    /// At least 70 % of the requirement.
    Nearly,
    /// Below 70 %.
    Behind,
}

/// Rendered progress of `completed` against `required`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Rounded percentage, may exceed 100.
    pub percent: u32,
    /// Bar fill, capped at 100.
    pub fill_percent: u32,
    /// Colour band.
    pub band: ProgressBand,
}

/// Compute progress of `completed` against `required`.
pub fn progress(completed: f64, required: f64) -> Progress {
    let completed = if completed.is_finite() { completed.max(0.0) } else { 0.0 };
    let percent = if required > 0.0 {
        (completed / required * 100.0).round().min(f64::from(u32::MAX)) as u32
    } else {
        100
    };
    let band = if completed >= required {
        ProgressBand::Complete
    } else if completed >= required * NEARLY_THRESHOLD {
        ProgressBand::Nearly
    } else {
        ProgressBand::Behind
    };
    Progress {
        percent,
        fill_percent: percent.min(100),
        band,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(progress(8.0, 8.0).band, ProgressBand::Complete);
        assert_eq!(progress(5.6, 8.0).band, ProgressBand::Nearly);
        assert_eq!(progress(5.5, 8.0).band, ProgressBand::Behind);
    }

    #[test]
    fn percent_rounds_and_fill_caps() {
        let p = progress(3.0, 8.0);
        assert_eq!(p.percent, 38);
        let over = progress(20.0, 16.0);
        assert_eq!(over.percent, 125);
        assert_eq!(over.fill_percent, 100);
    }

    #[test]
    fn nothing_required_is_complete() {
        let p = progress(0.0, 0.0);
        assert_eq!(p.percent, 100);
        assert_eq!(p.band, ProgressBand::Complete);
    }
}
