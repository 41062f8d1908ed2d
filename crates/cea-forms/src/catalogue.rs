//! The form catalogue: every form id a workflow may reference.

/// A catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    pub id: &'static str,
    pub name: &'static str,
}

const fn form(id: &'static str, name: &'static str) -> FormSpec {
    FormSpec { id, name }
}

/// All known forms.
pub static FORMS: &[FormSpec] = &[
    form("estate_agency_agreement_lease", "Estate Agency Agreement (Lease)"),
    form("letter_of_intent_residential", "Letter of Intent - Residential"),
    form("tenancy_agreement_residential", "Tenancy Agreement - Residential"),
    form("inventory_list", "Property Inventory List"),
    form("immigration_checklist", "Immigration Compliance Checklist"),
    form("customer_particulars_form", "Customer Particulars Form (AML)"),
    form("commission_agreement", "Commission Agreement"),
    form("letter_of_intent_commercial", "Letter of Intent - Commercial"),
    form("commercial_tenancy_agreement", "Commercial Tenancy Agreement"),
    form("commercial_inventory_list", "Commercial Inventory List"),
    form("business_registration_verification", "Business Registration Verification"),
    form("corporate_guarantor", "Corporate Guarantor Form"),
    form("estate_agency_agreement_sale", "Estate Agency Agreement (Sale)"),
    form("option_to_purchase", "Option to Purchase"),
    form("sale_purchase_agreement", "Sale & Purchase Agreement"),
    form("commission_agreement_sale", "Commission Agreement (Sale)"),
    form("mortgage_in_principle", "Mortgage in Principle"),
    form("cpf_withdrawal_form", "CPF Withdrawal Form"),
    form("legal_completion_form", "Legal Completion Form"),
    form("hdb_estate_agency_agreement", "HDB Estate Agency Agreement"),
    form("hdb_option_to_purchase", "HDB Option to Purchase"),
    form("hdb_resale_application", "HDB Resale Application"),
    form("hdb_completion_form", "HDB Completion Form"),
    form("cpf_valuation_waiver", "CPF Valuation Waiver"),
    form("hdb_loan_application", "HDB Loan Application"),
    form("rental_collection_form", "Rental Collection Form"),
    form("guarantor_form", "Guarantor Form"),
    form("diplomatic_clause_addendum", "Diplomatic Clause Addendum"),
    form("private_sale_purchase_agreement", "Private Sale & Purchase Agreement"),
    form("property_valuation_report", "Property Valuation Report"),
    form("private_property_insurance", "Private Property Insurance"),
    form("letter_of_intent_private", "Letter of Intent - Private Property"),
    form("private_tenancy_agreement", "Private Tenancy Agreement"),
    form("rental_insurance", "Rental Insurance"),
    form("utility_setup_form", "Utility Setup Form"),
];

/// Display name of `id`, if catalogued.
pub fn form_name(id: &str) -> Option<&'static str> {
    FORMS.iter().find(|f| f.id == id).map(|f| f.name)
}

/// Display name of `id`, falling back to the id itself.
pub fn display_name(id: &str) -> &str {
    form_name(id).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_has_35_unique_forms() {
        let ids: HashSet<_> = FORMS.iter().map(|f| f.id).collect();
        assert_eq!(FORMS.len(), 35);
        assert_eq!(ids.len(), 35);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(form_name("customer_particulars_form"), Some("Customer Particulars Form (AML)"));
        assert_eq!(display_name("no_such_form"), "no_such_form");
    }
}
