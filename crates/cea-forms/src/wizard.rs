//! # Forms Wizard
//!
//! ```text
//! TransactionType ──select──▶ DataCollection{0} ──next──▶ … ──next──▶ Results
//!                              ◀──previous──                 ──optional──▶ Results
//! any ──restart──▶ TransactionType
//! ```
//!
//! `next` refuses to leave a step whose required fields are blank. Leaving
//! the last data step generates every required form of the workflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::{forms_for, GeneratedForm};
use crate::master_data::{FieldError, MasterData};
use crate::schema::{DataCategory, FieldSpec};
use crate::workflow::{TransactionType, Workflow};

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardStep {
    /// Choosing the transaction type.
    TransactionType,
    /// Entering the data category at index `step` of the workflow.
    DataCollection { step: usize },
    /// Forms generated.
    Results,
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionType => "transaction_type",
            Self::DataCollection { .. } => "data_collection",
            Self::Results => "results",
        }
    }
}

/// A rejected wizard operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Operation is not valid in the current step.
    #[error("cannot {operation} during the {step} step")]
    WrongStep {
        operation: &'static str,
        step: &'static str,
    },

    /// Required fields of the current category are blank.
    #[error("{} required field(s) missing in {category}", .errors.len())]
    MissingFields {
        category: DataCategory,
        errors: Vec<FieldError>,
    },

    /// Form is not an optional form of the selected workflow.
    #[error("\"{form_id}\" is not an optional form of {transaction_type}")]
    NotOptional {
        form_id: String,
        transaction_type: TransactionType,
    },
}

/// One agent's pass through the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    step: WizardStep,
    transaction_type: Option<TransactionType>,
    master_data: MasterData,
    generated: Vec<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// A wizard at the transaction-type step.
    pub fn new() -> Self {
        Self {
            step: WizardStep::TransactionType,
            transaction_type: None,
            master_data: MasterData::new(),
            generated: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    pub fn master_data(&self) -> &MasterData {
        &self.master_data
    }

    /// Form ids generated so far, required forms first.
    pub fn generated(&self) -> &[String] {
        &self.generated
    }

    fn workflow(&self) -> Option<&'static Workflow> {
        self.transaction_type.map(|t| t.workflow())
    }

    fn wrong_step(&self, operation: &'static str) -> WizardError {
        WizardError::WrongStep {
            operation,
            step: self.step.name(),
        }
    }

    /// Data category being collected, if in a data step.
    pub fn current_category(&self) -> Option<DataCategory> {
        match (self.step, self.workflow()) {
            (WizardStep::DataCollection { step }, Some(w)) => w.data_categories.get(step).copied(),
            _ => None,
        }
    }

    /// Choose the transaction type and start collecting data.
    pub fn select(&mut self, transaction_type: TransactionType) -> Result<(), WizardError> {
        if self.step != WizardStep::TransactionType {
            return Err(self.wrong_step("select a transaction type"));
        }
        self.transaction_type = Some(transaction_type);
        self.step = WizardStep::DataCollection { step: 0 };
        tracing::debug!(transaction_type = %transaction_type, "wizard transaction selected");
        Ok(())
    }

    /// Merge master-data entries. Allowed in every step.
    pub fn update_data(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.master_data.merge(entries);
    }

    /// Validate the current category and advance. From the last category,
    /// generate the required forms and show the results.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let (WizardStep::DataCollection { step }, Some(workflow)) = (self.step, self.workflow()) else {
            return Err(self.wrong_step("advance"));
        };
        if let Some(category) = workflow.data_categories.get(step).copied() {
            self.master_data
                .validate(category)
                .map_err(|errors| WizardError::MissingFields { category, errors })?;
        }

        self.step = if step + 1 < workflow.data_categories.len() {
            WizardStep::DataCollection { step: step + 1 }
        } else {
            self.generated = workflow.required_forms.iter().map(|f| f.to_string()).collect();
            tracing::info!(
                transaction_type = %workflow.transaction_type,
                forms = self.generated.len(),
                "generated required forms"
            );
            WizardStep::Results
        };
        Ok(self.step)
    }

    /// Go back one data step; the first step stays put.
    pub fn previous(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::DataCollection { step } => {
                self.step = WizardStep::DataCollection {
                    step: step.saturating_sub(1),
                };
                Ok(self.step)
            }
            _ => Err(self.wrong_step("go back")),
        }
    }

    /// Generate an optional form of the workflow. Repeats are no-ops.
    pub fn generate_optional(&mut self, form_id: &str) -> Result<(), WizardError> {
        let (WizardStep::Results, Some(workflow)) = (self.step, self.workflow()) else {
            return Err(self.wrong_step("generate an optional form"));
        };
        if !workflow.offers_optional(form_id) {
            return Err(WizardError::NotOptional {
                form_id: form_id.to_string(),
                transaction_type: workflow.transaction_type,
            });
        }
        if !self.generated.iter().any(|g| g == form_id) {
            self.generated.push(form_id.to_string());
        }
        Ok(())
    }

    /// Start over: workflow, forms and master data are cleared.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> WizardView {
        let workflow = self.workflow();
        let category = self.current_category();
        WizardView {
            step: self.step,
            transaction_type: self.transaction_type,
            workflow_name: workflow.map(|w| w.name.to_string()),
            step_count: workflow.map_or(0, |w| w.data_categories.len()),
            category,
            category_label: category.map(|c| c.label()),
            fields: category.map(|c| c.field_specs()).unwrap_or_default(),
            master_data: self.master_data.clone(),
            forms: match (self.step, workflow) {
                (WizardStep::Results, Some(w)) => forms_for(w, &self.generated, &self.master_data),
                _ => Vec::new(),
            },
        }
    }
}

/// Everything a client needs to draw the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub transaction_type: Option<TransactionType>,
    pub workflow_name: Option<String>,
    /// Number of data-collection steps in the workflow.
    pub step_count: usize,
    pub category: Option<DataCategory>,
    pub category_label: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub master_data: MasterData,
    pub forms: Vec<GeneratedForm>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::FormStatus;

    fn fill(wizard: &mut Wizard, category: DataCategory) {
        let entries = category
            .required_fields()
            .iter()
            .map(|f| (MasterData::key(category, f), "x".to_string()));
        wizard.update_data(entries);
    }

    fn at_results(t: TransactionType) -> Wizard {
        let mut wizard = Wizard::new();
        wizard.select(t).unwrap();
        for category in t.workflow().data_categories {
            fill(&mut wizard, *category);
            wizard.next().unwrap();
        }
        wizard
    }

    #[test]
    fn select_starts_data_collection() {
        let mut wizard = Wizard::new();
        wizard.select(TransactionType::ResidentialSale).unwrap();
        assert_eq!(wizard.step(), WizardStep::DataCollection { step: 0 });
        assert_eq!(wizard.current_category(), Some(DataCategory::VendorInfo));
        assert!(matches!(
            wizard.select(TransactionType::HdbResale),
            Err(WizardError::WrongStep { .. })
        ));
    }

    #[test]
    fn next_blocks_on_missing_required_fields() {
        let mut wizard = Wizard::new();
        wizard.select(TransactionType::ResidentialLease).unwrap();
        let err = wizard.next().unwrap_err();
        match err {
            WizardError::MissingFields { category, errors } => {
                assert_eq!(category, DataCategory::LandlordInfo);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(wizard.step(), WizardStep::DataCollection { step: 0 });
    }

    #[test]
    fn walking_all_steps_generates_required_forms() {
        let wizard = at_results(TransactionType::ResidentialLease);
        assert_eq!(wizard.step(), WizardStep::Results);
        assert_eq!(wizard.generated().len(), 7);
        let view = wizard.view();
        assert_eq!(view.forms.len(), 10);
        assert_eq!(
            view.forms.iter().filter(|f| f.status == FormStatus::Generated).count(),
            7
        );
    }

    #[test]
    fn previous_saturates_at_first_step() {
        let mut wizard = Wizard::new();
        wizard.select(TransactionType::CommercialLease).unwrap();
        fill(&mut wizard, DataCategory::LandlordInfo);
        wizard.next().unwrap();
        assert_eq!(wizard.previous().unwrap(), WizardStep::DataCollection { step: 0 });
        assert_eq!(wizard.previous().unwrap(), WizardStep::DataCollection { step: 0 });
        assert!(Wizard::new().previous().is_err());
    }

    #[test]
    fn optional_forms_are_checked_and_idempotent() {
        let mut wizard = at_results(TransactionType::PrivatePropertyRental);
        wizard.generate_optional("rental_insurance").unwrap();
        wizard.generate_optional("rental_insurance").unwrap();
        assert_eq!(wizard.generated().len(), 7);
        assert!(matches!(
            wizard.generate_optional("hdb_loan_application"),
            Err(WizardError::NotOptional { .. })
        ));

        let mut early = Wizard::new();
        early.select(TransactionType::PrivatePropertyRental).unwrap();
        assert!(matches!(
            early.generate_optional("rental_insurance"),
            Err(WizardError::WrongStep { .. })
        ));
    }

    #[test]
    fn restart_clears_everything() {
        let mut wizard = at_results(TransactionType::HdbResale);
        wizard.restart();
        assert_eq!(wizard, Wizard::new());
        assert!(wizard.view().forms.is_empty());
    }

    #[test]
    fn view_describes_current_step() {
        let mut wizard = Wizard::new();
        wizard.select(TransactionType::PrivatePropertySale).unwrap();
        let view = wizard.view();
        assert_eq!(view.workflow_name.as_deref(), Some("Private Property Sale"));
        assert_eq!(view.step_count, 5);
        assert_eq!(view.category_label.as_deref(), Some("Vendor Info Information"));
        assert_eq!(view.fields.len(), 5);
    }
}
