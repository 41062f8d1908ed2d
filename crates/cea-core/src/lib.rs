//! # cea-core: Foundational Types for the CEA Agent Desk
//!
//! Every other crate in the workspace depends on `cea-core`; it depends on
//! nothing internal. It defines the records the hosted backend stores for a
//! licensed agent and the small amount of logic that belongs to the records
//! themselves.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `UserId`, `RecordId` and `LicenseNumber` are
//!    distinct types; a license number cannot be passed where a user id is
//!    expected.
//!
//! 2. **Lenient numerics at the edge.** Backend rows carry hours and credits
//!    as whatever the row happens to hold (number, numeric string, null).
//!    [`LenientNumber`] keeps the raw value and resolves it to `f64` with
//!    non-numeric input counting as zero.
//!
//! 3. **Forward-compatible enums.** Status and role enums carry an `Unknown`
//!    catch-all so a new backend value never fails deserialization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cea-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod cpd;
pub mod error;
pub mod identity;
pub mod license;
pub mod numeric;
pub mod profile;
pub mod role;

// Re-export primary types for ergonomic imports.
pub use cpd::{CpdCategory, CpdRecord, CpdStatus, PrescribedEssentialTopic};
pub use error::ValidationError;
pub use identity::{LicenseNumber, RecordId, UserId};
pub use license::{License, LicenseStatus};
pub use numeric::LenientNumber;
pub use profile::{AuthUser, ProfileRow, UserProfile};
pub use role::Role;
