//! # Workflows Subcommand
//!
//! Read-only view of the transaction workflow tables.

use anyhow::Result;
use clap::{Args, Subcommand};

use cea_forms::catalogue::display_name;
use cea_forms::{DataCategory, FieldSpec, InputType, TransactionType, Workflow};

#[derive(Args, Debug)]
pub struct WorkflowsArgs {
    #[command(subcommand)]
    pub command: WorkflowsCommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowsCommand {
    /// List the transaction workflows.
    List,
    /// Show forms and data categories of one workflow.
    Show {
        /// Transaction type, e.g. `hdb_resale`.
        id: String,
    },
    /// Print the fields of a data category.
    Schema {
        /// Data category, e.g. `tenant_info`.
        category: String,
    },
}

pub fn run_workflows(args: &WorkflowsArgs) -> Result<u8> {
    let text = match &args.command {
        WorkflowsCommand::List => render_list(),
        WorkflowsCommand::Show { id } => render_workflow(id.parse::<TransactionType>()?.workflow()),
        WorkflowsCommand::Schema { category } => render_schema(category.parse::<DataCategory>()?),
    };
    print!("{text}");
    Ok(0)
}

pub fn render_list() -> String {
    Workflow::all()
        .iter()
        .map(|w| {
            format!(
                "{:<26} {:<32} {} required, {} optional\n",
                w.transaction_type.as_str(),
                w.name,
                w.required_forms.len(),
                w.optional_forms.len()
            )
        })
        .collect()
}

pub fn render_workflow(workflow: &Workflow) -> String {
    let mut out = format!("{} ({})\n", workflow.name, workflow.transaction_type);
    out.push_str("\nRequired forms:\n");
    for id in workflow.required_forms {
        out.push_str(&format!("  {:<36} {}\n", id, display_name(id)));
    }
    out.push_str("\nOptional forms:\n");
    for id in workflow.optional_forms {
        out.push_str(&format!("  {:<36} {}\n", id, display_name(id)));
    }
    out.push_str("\nData collection:\n");
    for (i, category) in workflow.data_categories.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, category.label()));
    }
    out
}

pub fn render_schema(category: DataCategory) -> String {
    let mut out = format!("{}\n", category.label());
    for field in category.field_specs() {
        out.push_str(&format!(
            "  {:<24} {:<7} {}{}\n",
            field.name,
            input_type_word(&field),
            field.label,
            if field.required { " *" } else { "" }
        ));
    }
    out
}

fn input_type_word(field: &FieldSpec) -> &'static str {
    match field.input_type {
        InputType::Text => "text",
        InputType::Number => "number",
        InputType::Date => "date",
        InputType::Email => "email",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_has_one_line_per_workflow() {
        let text = render_list();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().next().unwrap().starts_with("residential_lease"));
    }

    #[test]
    fn workflow_shows_form_names_and_steps() {
        let text = render_workflow(TransactionType::HdbResale.workflow());
        assert!(text.starts_with("HDB Resale Transaction (hdb_resale)"));
        assert!(text.contains("hdb_option_to_purchase"));
        assert!(text.contains("1. Vendor Info Information"));
    }

    #[test]
    fn schema_marks_required_fields() {
        let text = render_schema(DataCategory::TenantInfo);
        let required: Vec<&str> = text.lines().filter(|l| l.ends_with(" *")).collect();
        assert_eq!(required.len(), DataCategory::TenantInfo.required_fields().len());
    }

    #[test]
    fn unknown_transaction_type_is_an_error() {
        let args = WorkflowsArgs {
            command: WorkflowsCommand::Show { id: "castle".into() },
        };
        assert!(run_workflows(&args).is_err());
    }
}
