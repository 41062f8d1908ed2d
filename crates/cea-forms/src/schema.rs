//! # Data-Collection Schema
//!
//! The categories of transaction details an agent enters, the fields of
//! each category, which of them are required, and how each field is
//! presented (input type, placeholder, label).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormsError;

/// A group of related transaction details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    LandlordInfo,
    TenantInfo,
    VendorInfo,
    PurchaserInfo,
    PropertyDetails,
    LeaseTerms,
    SaleTerms,
    AgentInfo,
}

impl DataCategory {
    /// Every category.
    pub const ALL: [DataCategory; 8] = [
        Self::LandlordInfo,
        Self::TenantInfo,
        Self::VendorInfo,
        Self::PurchaserInfo,
        Self::PropertyDetails,
        Self::LeaseTerms,
        Self::SaleTerms,
        Self::AgentInfo,
    ];

    /// Snake-case identifier, also the master-data key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LandlordInfo => "landlord_info",
            Self::TenantInfo => "tenant_info",
            Self::VendorInfo => "vendor_info",
            Self::PurchaserInfo => "purchaser_info",
            Self::PropertyDetails => "property_details",
            Self::LeaseTerms => "lease_terms",
            Self::SaleTerms => "sale_terms",
            Self::AgentInfo => "agent_info",
        }
    }

    /// Fields collected, in display order.
    pub fn fields(&self) -> &'static [&'static str] {
        const PARTY: &[&str] = &["name", "nric", "address", "contact", "email"];
        match self {
            Self::LandlordInfo | Self::TenantInfo | Self::VendorInfo | Self::PurchaserInfo => PARTY,
            Self::PropertyDetails => &["address", "property_type", "built_up_area", "num_bedrooms"],
            Self::LeaseTerms => &["lease_duration", "monthly_rental", "deposit_amount"],
            Self::SaleTerms => &["sale_price", "completion_date", "deposit_percentage"],
            Self::AgentInfo => &["name", "cea_reg_no", "mobile", "email"],
        }
    }

    /// Fields that must be non-empty before the wizard moves on.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::LandlordInfo | Self::TenantInfo => &["name", "contact"],
            Self::VendorInfo | Self::PurchaserInfo => &["name"],
            Self::PropertyDetails => &["address"],
            Self::LeaseTerms => &["monthly_rental"],
            Self::SaleTerms => &["sale_price"],
            Self::AgentInfo => &["name", "cea_reg_no"],
        }
    }

    /// Whether `field` is required in this category.
    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields().contains(&field)
    }

    /// Section heading, e.g. "Landlord Info Information".
    pub fn label(&self) -> String {
        format!("{} Information", humanize(self.as_str()))
    }

    /// Presentation of every field in this category.
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        self.fields()
            .iter()
            .map(|field| FieldSpec {
                name: field.to_string(),
                label: humanize(field),
                input_type: input_type(field),
                placeholder: placeholder(field),
                required: self.is_required(field),
            })
            .collect()
    }
}

impl FromStr for DataCategory {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| FormsError::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTML input type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
    Date,
    Email,
}

/// How one field is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub input_type: InputType,
    pub placeholder: String,
    pub required: bool,
}

/// Input type for a field name.
pub fn input_type(field: &str) -> InputType {
    match field {
        "commencement_date" | "completion_date" | "expiry_date" => InputType::Date,
        "monthly_rental" | "deposit_amount" | "lease_duration" | "built_up_area" | "sale_price"
        | "deposit_percentage" => InputType::Number,
        "email" => InputType::Email,
        _ => InputType::Text,
    }
}

/// Placeholder text for a field name.
pub fn placeholder(field: &str) -> String {
    let fixed = match field {
        "nric" => "S1234567A or FIN",
        "contact" => "+65 9123 4567",
        "email" => "example@email.com",
        "postal_code" => "123456",
        "monthly_rental" => "3000.00",
        "cea_reg_no" => "R123456A",
        "sale_price" => "800000.00",
        "deposit_percentage" => "10",
        _ => return format!("Enter {}", field.replacen('_', " ", 1)),
    };
    fixed.to_string()
}

/// Replace the first underscore with a space and capitalise each word.
fn humanize(s: &str) -> String {
    s.replacen('_', " ", 1)
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_fields() {
        for category in DataCategory::ALL {
            for req in category.required_fields() {
                assert!(category.fields().contains(req), "{category}.{req}");
            }
        }
    }

    #[test]
    fn input_types() {
        assert_eq!(input_type("completion_date"), InputType::Date);
        assert_eq!(input_type("sale_price"), InputType::Number);
        assert_eq!(input_type("email"), InputType::Email);
        assert_eq!(input_type("num_bedrooms"), InputType::Text);
    }

    #[test]
    fn placeholders_replace_only_first_underscore() {
        assert_eq!(placeholder("nric"), "S1234567A or FIN");
        assert_eq!(placeholder("property_type"), "Enter property type");
        assert_eq!(placeholder("built_up_area"), "Enter built up_area");
    }

    #[test]
    fn labels() {
        assert_eq!(DataCategory::LandlordInfo.label(), "Landlord Info Information");
        let specs = DataCategory::AgentInfo.field_specs();
        assert_eq!(specs[1].label, "Cea Reg_no");
        assert!(specs[1].required);
        assert!(!specs[2].required);
    }

    #[test]
    fn category_parses() {
        assert_eq!("sale_terms".parse::<DataCategory>(), Ok(DataCategory::SaleTerms));
        assert!("bank_info".parse::<DataCategory>().is_err());
    }
}
