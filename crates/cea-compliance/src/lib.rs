//! # cea-compliance: CPD Compliance Rules
//!
//! Everything the agent desk knows about Continuing Professional
//! Development lives here:
//!
//! - [`Framework`]: which rule set applies to a compliance year. Years from
//!   [`FRAMEWORK_CUTOFF_YEAR`] onward use the multi-component hours
//!   framework; earlier years use legacy credits.
//! - [`evaluate`]: the compliance calculator.
//! - [`progress`]: percent and colour band for progress bars.
//! - [`entry`]: validation and shaping of a new CPD record before insert.
//! - [`approval`]: KEO approval of self-directed learning.
//!
//! ## Architecture
//!
//! ```text
//! cea-core (rows)  -->  cea-compliance (rules)  -->  cea-api / cea-cli (surfaces)
//!   CpdRecord             evaluate() -> ComplianceReport
//! ```
//!
//! The crate is pure: no I/O, no clocks. Callers pass the year.

pub mod approval;
pub mod calculator;
pub mod entry;
pub mod framework;
pub mod progress;

pub use approval::{approve, is_pending_keo_approval, ApprovalError, KeoApproval};
pub use calculator::{evaluate, filter_for_year, ComplianceReport, ComponentProgress};
pub use entry::{build_record, CpdEntryInput, FieldIssue, NewCpdRecord, RecordEntryError};
pub use framework::{Framework, Unit, FRAMEWORK_CUTOFF_YEAR};
pub use progress::{progress, Progress, ProgressBand};
