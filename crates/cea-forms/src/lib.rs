//! # cea-forms: Transaction Paperwork
//!
//! A transaction type determines which regulatory forms an agent must
//! prepare and which details must be collected to fill them. The agent
//! enters those details once (the *master data*) and every form of the
//! workflow is populated from it.
//!
//! ## Modules
//!
//! - [`catalogue`]: the 35 known forms and their display names.
//! - [`schema`]: data categories, their fields and presentation hints.
//! - [`workflow`]: the six transaction workflows.
//! - [`master_data`]: the `{category}_{field}` value bag and its validation.
//! - [`generation`]: the form list produced for a finished workflow.
//! - [`wizard`]: the step machine tying the above together.
//!
//! All tables are static; nothing here performs I/O.

pub mod catalogue;
pub mod error;
pub mod generation;
pub mod master_data;
pub mod schema;
pub mod wizard;
pub mod workflow;

pub use catalogue::{form_name, FormSpec, FORMS};
pub use error::FormsError;
pub use generation::{FormPriority, FormStatus, GeneratedForm};
pub use master_data::{FieldError, MasterData};
pub use schema::{DataCategory, FieldSpec, InputType};
pub use wizard::{Wizard, WizardError, WizardStep, WizardView};
pub use workflow::{TransactionType, Workflow};
