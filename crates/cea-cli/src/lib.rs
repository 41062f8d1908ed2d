//! # cea-cli: Command-Line Tool for the CEA Agent Desk
//!
//! ## Subcommands
//!
//! - `cea compliance evaluate`: evaluate a file of CPD records offline.
//! - `cea workflows`: list workflows, show one, print a category schema.
//! - `cea login` / `cea logout` / `cea whoami`: backend session kept in a
//!   local JSON file.
//! - `cea cpd status`: evaluate the signed-in user's records for a year.
//!
//! ```bash
//! cea compliance evaluate --records records.yaml --year 2026
//! cea workflows show hdb_resale
//! CEA_PASSWORD=... cea login --email tan@agency.sg
//! cea cpd status --year 2026
//! ```
//!
//! ## Exit codes
//!
//! `0` success (and compliant, for evaluations), `1` error, `2` evaluated
//! but not compliant.

pub mod account;
pub mod compliance;
pub mod session;
pub mod workflows;

/// Exit code of an evaluation that found the records non-compliant.
pub const EXIT_NOT_COMPLIANT: u8 = 2;
