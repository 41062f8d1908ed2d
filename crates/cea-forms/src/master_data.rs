//! # Master Data
//!
//! The single bag of transaction details every form is populated from.
//! Keys are `{category}_{field}`, e.g. `landlord_info_name`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::DataCategory;

/// Message attached to a missing required field.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub category: DataCategory,
    pub field: String,
    pub message: String,
}

/// Collected transaction details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterData(BTreeMap<String, String>);

impl MasterData {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key of `field` in `category`.
    pub fn key(category: DataCategory, field: &str) -> String {
        format!("{}_{}", category.as_str(), field)
    }

    /// Set a raw key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set `field` of `category`.
    pub fn set_field(&mut self, category: DataCategory, field: &str, value: impl Into<String>) {
        self.set(Self::key(category, field), value);
    }

    /// Value of a raw key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `field` in `category`.
    pub fn field(&self, category: DataCategory, field: &str) -> Option<&str> {
        self.get(&Self::key(category, field))
    }

    /// Merge `entries`, later values overwriting earlier ones.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.0.extend(entries);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Required fields of `category` that are missing or blank.
    pub fn validate(&self, category: DataCategory) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = category
            .required_fields()
            .iter()
            .filter(|field| self.field(category, field).map_or(true, |v| v.trim().is_empty()))
            .map(|field| FieldError {
                category,
                field: field.to_string(),
                message: REQUIRED_MESSAGE.to_string(),
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Entries belonging to any of `categories`.
    pub fn entries_for(&self, categories: &[DataCategory]) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(key, _)| {
                categories.iter().any(|c| {
                    key.strip_prefix(c.as_str())
                        .is_some_and(|rest| rest.starts_with('_'))
                })
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for MasterData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_category_prefixed() {
        let mut data = MasterData::new();
        data.set_field(DataCategory::LandlordInfo, "name", "Tan Ah Kow");
        assert_eq!(data.get("landlord_info_name"), Some("Tan Ah Kow"));
    }

    #[test]
    fn blank_required_fields_fail() {
        let mut data = MasterData::new();
        data.set_field(DataCategory::TenantInfo, "name", "  ");
        let errors = data.validate(DataCategory::TenantInfo).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "contact"]);
        assert!(errors.iter().all(|e| e.message == REQUIRED_MESSAGE));

        data.set_field(DataCategory::TenantInfo, "name", "Lim");
        data.set_field(DataCategory::TenantInfo, "contact", "+65 9000 0000");
        assert!(data.validate(DataCategory::TenantInfo).is_ok());
    }

    #[test]
    fn entries_for_filters_by_category() {
        let data: MasterData = [
            ("sale_terms_sale_price".to_string(), "800000".to_string()),
            ("agent_info_name".to_string(), "Ng".to_string()),
            ("sale_termsx".to_string(), "junk".to_string()),
        ]
        .into_iter()
        .collect();
        let picked = data.entries_for(&[DataCategory::SaleTerms]);
        assert_eq!(picked.len(), 1);
        assert!(picked.contains_key("sale_terms_sale_price"));
    }

    #[test]
    fn serializes_as_a_flat_map() {
        let mut data = MasterData::new();
        data.set_field(DataCategory::AgentInfo, "cea_reg_no", "R123456A");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"agent_info_cea_reg_no": "R123456A"}));
        let back: MasterData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
