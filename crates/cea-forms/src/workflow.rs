//! # Transaction Workflows
//!
//! Each transaction type fixes the forms to prepare and the data categories
//! to collect, in order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormsError;
use crate::schema::DataCategory;
use crate::schema::DataCategory::{
    AgentInfo, LandlordInfo, LeaseTerms, PropertyDetails, PurchaserInfo, SaleTerms, TenantInfo,
    VendorInfo,
};

/// Kind of property transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    ResidentialLease,
    CommercialLease,
    ResidentialSale,
    HdbResale,
    PrivatePropertySale,
    PrivatePropertyRental,
}

/// A transaction workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workflow {
    pub transaction_type: TransactionType,
    pub name: &'static str,
    pub required_forms: &'static [&'static str],
    pub optional_forms: &'static [&'static str],
    pub data_categories: &'static [DataCategory],
}

const LEASE_PARTIES: &[DataCategory] = &[LandlordInfo, TenantInfo, PropertyDetails, LeaseTerms, AgentInfo];

static WORKFLOWS: [Workflow; 6] = [
    Workflow {
        transaction_type: TransactionType::ResidentialLease,
        name: "Residential Property Lease",
        required_forms: &[
            "estate_agency_agreement_lease",
            "letter_of_intent_residential",
            "tenancy_agreement_residential",
            "inventory_list",
            "immigration_checklist",
            "customer_particulars_form",
            "commission_agreement",
        ],
        optional_forms: &["rental_collection_form", "guarantor_form", "diplomatic_clause_addendum"],
        data_categories: LEASE_PARTIES,
    },
    Workflow {
        transaction_type: TransactionType::CommercialLease,
        name: "Commercial Property Lease",
        required_forms: &[
            "estate_agency_agreement_lease",
            "letter_of_intent_commercial",
            "commercial_tenancy_agreement",
            "commercial_inventory_list",
            "customer_particulars_form",
            "commission_agreement",
        ],
        optional_forms: &["business_registration_verification", "corporate_guarantor"],
        data_categories: LEASE_PARTIES,
    },
    Workflow {
        transaction_type: TransactionType::ResidentialSale,
        name: "Residential Property Sale",
        required_forms: &[
            "estate_agency_agreement_sale",
            "option_to_purchase",
            "sale_purchase_agreement",
            "commission_agreement_sale",
            "customer_particulars_form",
        ],
        optional_forms: &["mortgage_in_principle", "cpf_withdrawal_form", "legal_completion_form"],
        data_categories: &[VendorInfo, PurchaserInfo, PropertyDetails, LeaseTerms, AgentInfo],
    },
    Workflow {
        transaction_type: TransactionType::HdbResale,
        name: "HDB Resale Transaction",
        required_forms: &[
            "hdb_estate_agency_agreement",
            "hdb_option_to_purchase",
            "hdb_resale_application",
            "hdb_completion_form",
            "commission_agreement",
            "customer_particulars_form",
        ],
        optional_forms: &["cpf_valuation_waiver", "hdb_loan_application"],
        data_categories: &[VendorInfo, PurchaserInfo, PropertyDetails, LeaseTerms, AgentInfo],
    },
    Workflow {
        transaction_type: TransactionType::PrivatePropertySale,
        name: "Private Property Sale",
        required_forms: &[
            "estate_agency_agreement_sale",
            "option_to_purchase",
            "private_sale_purchase_agreement",
            "commission_agreement_sale",
            "customer_particulars_form",
            "property_valuation_report",
        ],
        optional_forms: &["mortgage_in_principle", "legal_completion_form", "private_property_insurance"],
        data_categories: &[VendorInfo, PurchaserInfo, PropertyDetails, SaleTerms, AgentInfo],
    },
    Workflow {
        transaction_type: TransactionType::PrivatePropertyRental,
        name: "Private Property Rental",
        required_forms: &[
            "estate_agency_agreement_lease",
            "letter_of_intent_private",
            "private_tenancy_agreement",
            "inventory_list",
            "customer_particulars_form",
            "commission_agreement",
        ],
        optional_forms: &["rental_insurance", "guarantor_form", "utility_setup_form"],
        data_categories: LEASE_PARTIES,
    },
];

impl TransactionType {
    /// Every transaction type in display order.
    pub const ALL: [TransactionType; 6] = [
        Self::ResidentialLease,
        Self::CommercialLease,
        Self::ResidentialSale,
        Self::HdbResale,
        Self::PrivatePropertySale,
        Self::PrivatePropertyRental,
    ];

    /// Snake-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResidentialLease => "residential_lease",
            Self::CommercialLease => "commercial_lease",
            Self::ResidentialSale => "residential_sale",
            Self::HdbResale => "hdb_resale",
            Self::PrivatePropertySale => "private_property_sale",
            Self::PrivatePropertyRental => "private_property_rental",
        }
    }

    /// The workflow for this transaction type.
    pub fn workflow(&self) -> &'static Workflow {
        match self {
            Self::ResidentialLease => &WORKFLOWS[0],
            Self::CommercialLease => &WORKFLOWS[1],
            Self::ResidentialSale => &WORKFLOWS[2],
            Self::HdbResale => &WORKFLOWS[3],
            Self::PrivatePropertySale => &WORKFLOWS[4],
            Self::PrivatePropertyRental => &WORKFLOWS[5],
        }
    }
}

impl FromStr for TransactionType {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FormsError::UnknownTransactionType(s.to_string()))
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Workflow {
    /// All workflows in display order.
    pub fn all() -> &'static [Workflow] {
        &WORKFLOWS
    }

    /// Whether `form_id` is an optional form of this workflow.
    pub fn offers_optional(&self, form_id: &str) -> bool {
        self.optional_forms.contains(&form_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::form_name;

    #[test]
    fn lookup_matches_table_position() {
        for t in TransactionType::ALL {
            assert_eq!(t.workflow().transaction_type, t);
        }
    }

    #[test]
    fn every_form_is_catalogued() {
        for w in Workflow::all() {
            for id in w.required_forms.iter().chain(w.optional_forms) {
                assert!(form_name(id).is_some(), "{} references {id}", w.name);
            }
        }
    }

    #[test]
    fn required_and_optional_are_disjoint() {
        for w in Workflow::all() {
            assert!(w.required_forms.iter().all(|f| !w.optional_forms.contains(f)));
        }
    }

    #[test]
    fn every_workflow_collects_five_categories_ending_with_agent() {
        for w in Workflow::all() {
            assert_eq!(w.data_categories.len(), 5);
            assert_eq!(w.data_categories.last(), Some(&DataCategory::AgentInfo));
        }
    }

    #[test]
    fn parse_round_trips_ids() {
        assert_eq!("hdb_resale".parse::<TransactionType>(), Ok(TransactionType::HdbResale));
        assert_eq!(
            "condo".parse::<TransactionType>(),
            Err(FormsError::UnknownTransactionType("condo".into()))
        );
    }
}
