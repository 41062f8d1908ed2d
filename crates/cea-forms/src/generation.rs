//! Forms produced for a completed workflow.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalogue::display_name;
use crate::master_data::MasterData;
use crate::workflow::Workflow;

/// Whether a form has been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Generated,
    Available,
}

/// Whether a form is mandatory for the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPriority {
    Mandatory,
    Optional,
}

/// One form of a workflow's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedForm {
    pub form_id: String,
    pub name: String,
    pub status: FormStatus,
    pub priority: FormPriority,
    /// Master-data entries the form is populated with. Empty until generated.
    pub data: BTreeMap<String, String>,
}

/// Required forms (always generated) followed by optional forms, which are
/// generated when listed in `generated`.
pub fn forms_for(workflow: &Workflow, generated: &[String], master: &MasterData) -> Vec<GeneratedForm> {
    let populated = master.entries_for(workflow.data_categories);
    let make = |id: &str, status: FormStatus, priority: FormPriority| GeneratedForm {
        form_id: id.to_string(),
        name: display_name(id).to_string(),
        status,
        priority,
        data: match status {
            FormStatus::Generated => populated.clone(),
            FormStatus::Available => BTreeMap::new(),
        },
    };

    let required = workflow
        .required_forms
        .iter()
        .map(|id| make(id, FormStatus::Generated, FormPriority::Mandatory));
    let optional = workflow.optional_forms.iter().map(|id| {
        let status = if generated.iter().any(|g| g == id) {
            FormStatus::Generated
        } else {
            FormStatus::Available
        };
        make(id, status, FormPriority::Optional)
    });
    required.chain(optional).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataCategory;
    use crate::workflow::TransactionType;

    #[test]
    fn required_forms_come_first_and_are_populated() {
        let workflow = TransactionType::CommercialLease.workflow();
        let mut master = MasterData::new();
        master.set_field(DataCategory::LandlordInfo, "name", "Acme Pte Ltd");
        master.set_field(DataCategory::SaleTerms, "sale_price", "1");

        let forms = forms_for(workflow, &[], &master);
        assert_eq!(forms.len(), 8);
        assert_eq!(forms[0].name, "Estate Agency Agreement (Lease)");
        assert_eq!(forms[0].priority, FormPriority::Mandatory);
        assert_eq!(forms[0].data.len(), 1);
        assert!(forms[6..].iter().all(|f| f.status == FormStatus::Available && f.data.is_empty()));
    }

    #[test]
    fn generated_optional_forms_flip_status() {
        let workflow = TransactionType::HdbResale.workflow();
        let forms = forms_for(workflow, &["hdb_loan_application".to_string()], &MasterData::new());
        let loan = forms.iter().find(|f| f.form_id == "hdb_loan_application").unwrap();
        assert_eq!(loan.status, FormStatus::Generated);
        assert_eq!(loan.priority, FormPriority::Optional);
    }
}
