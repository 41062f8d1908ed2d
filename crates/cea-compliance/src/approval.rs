//! KEO approval of self-directed learning records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cea_core::{CpdCategory, CpdRecord};

/// Whether `record` is self-directed learning not yet approved by a KEO.
pub fn is_pending_keo_approval(record: &CpdRecord) -> bool {
    record.category() == Some(CpdCategory::SelfDirectedLearning) && record.keo_approved != Some(true)
}

/// Patch applied to an approved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeoApproval {
    pub keo_approved: bool,
}

/// Why a record cannot be approved.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("only self-directed learning records need KEO approval")]
    NotSelfDirected,
    #[error("record is already KEO-approved")]
    AlreadyApproved,
}

/// Check that `record` can be approved and return the patch to apply.
pub fn approve(record: &CpdRecord) -> Result<KeoApproval, ApprovalError> {
    if record.category() != Some(CpdCategory::SelfDirectedLearning) {
        return Err(ApprovalError::NotSelfDirected);
    }
    if record.keo_approved == Some(true) {
        return Err(ApprovalError::AlreadyApproved);
    }
    Ok(KeoApproval { keo_approved: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(category: &str, approved: serde_json::Value) -> CpdRecord {
        serde_json::from_value(json!({
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "course_name": "Reading",
            "completion_date": "2026-05-01",
            "compliance_year": 2026,
            "status": "Completed",
            "cpd_category": category,
            "keo_approved": approved
        }))
        .unwrap()
    }

    #[test]
    fn unapproved_sdl_is_pending() {
        assert!(is_pending_keo_approval(&record("Self_Directed_Learning_GC_Plus", json!(false))));
        assert!(is_pending_keo_approval(&record("Self_Directed_Learning_GC_Plus", json!(null))));
        assert!(!is_pending_keo_approval(&record("Self_Directed_Learning_GC_Plus", json!(true))));
        assert!(!is_pending_keo_approval(&record("Structured_Learning_PC", json!(false))));
    }

    #[test]
    fn approve_checks_category_and_state() {
        assert_eq!(
            approve(&record("Self_Directed_Learning_GC_Plus", json!(false))),
            Ok(KeoApproval { keo_approved: true })
        );
        assert_eq!(
            approve(&record("Structured_Learning_PE", json!(null))),
            Err(ApprovalError::NotSelfDirected)
        );
        assert_eq!(
            approve(&record("Self_Directed_Learning_GC_Plus", json!(true))),
            Err(ApprovalError::AlreadyApproved)
        );
    }
}
