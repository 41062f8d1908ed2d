//! # Lenient Numeric Fields
//!
//! CPD rows store `training_hours` and `cpd_credits` as whatever the writer
//! sent: JSON numbers, numeric strings, strings with trailing units, nulls.
//! [`LenientNumber`] keeps the raw JSON value so rows round-trip unchanged,
//! and resolves it to `f64` with the leading-number rule:
//!
//! - numbers resolve to themselves,
//! - strings resolve to their longest leading decimal literal
//!   (`"3.5 hrs"` → 3.5, `" 2"` → 2),
//! - everything else (null, booleans, `"n/a"`, non-finite results) is 0.
//!
//! Text columns get the same treatment through [`null_as_default`]: an
//! explicit `null` reads like a missing key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A numeric field read leniently from a backend row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LenientNumber(Value);

impl LenientNumber {
    /// Wrap an exact numeric value.
    pub fn from_f64(v: f64) -> Self {
        Self(serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    /// Wrap a raw JSON value.
    pub fn from_raw(v: Value) -> Self {
        Self(v)
    }

    /// The raw stored value.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Resolve to a finite `f64`; anything unparseable is 0.
    pub fn value(&self) -> f64 {
        match &self.0 {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            Value::String(s) => leading_float(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<f64> for LenientNumber {
    fn from(v: f64) -> Self {
        Self::from_f64(v)
    }
}

/// Resolve an optional field, treating absence as 0.
pub fn value_or_zero(field: Option<&LenientNumber>) -> f64 {
    field.map_or(0.0, LenientNumber::value)
}

/// Deserialize `null` as `T::default()`.
///
/// `#[serde(default)]` alone only covers an absent key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parse the longest leading decimal literal of `s`.
///
/// Leading whitespace is skipped. An optional sign, digits with at most one
/// decimal point (at least one digit overall) and an optional exponent are
/// consumed; the rest of the string is ignored.
pub fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        i = j;
    }

    if digits == 0 {
        return None;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn lenient(v: Value) -> f64 {
        LenientNumber::from_raw(v).value()
    }

    #[test]
    fn numbers_resolve_to_themselves() {
        assert_eq!(lenient(json!(4)), 4.0);
        assert_eq!(lenient(json!(2.5)), 2.5);
    }

    #[test]
    fn numeric_strings_resolve() {
        assert_eq!(lenient(json!("3")), 3.0);
        assert_eq!(lenient(json!("  1.5")), 1.5);
        assert_eq!(lenient(json!(".5")), 0.5);
        assert_eq!(lenient(json!("5.")), 5.0);
        assert_eq!(lenient(json!("2e1")), 20.0);
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(lenient(json!("3.5 hrs")), 3.5);
        assert_eq!(lenient(json!("4hours")), 4.0);
        assert_eq!(lenient(json!("1.2.3")), 1.2);
        assert_eq!(lenient(json!("7e")), 7.0);
    }

    #[test]
    fn non_numeric_is_zero() {
        assert_eq!(lenient(json!(null)), 0.0);
        assert_eq!(lenient(json!("n/a")), 0.0);
        assert_eq!(lenient(json!("")), 0.0);
        assert_eq!(lenient(json!(".")), 0.0);
        assert_eq!(lenient(json!("-")), 0.0);
        assert_eq!(lenient(json!(true)), 0.0);
        assert_eq!(lenient(json!([1, 2])), 0.0);
        assert_eq!(lenient(json!({"hours": 3})), 0.0);
    }

    #[test]
    fn overflow_is_zero() {
        assert_eq!(lenient(json!("1e400")), 0.0);
    }

    #[test]
    fn missing_field_is_zero() {
        assert_eq!(value_or_zero(None), 0.0);
        assert_eq!(value_or_zero(Some(&LenientNumber::from_f64(2.0))), 2.0);
    }

    #[test]
    fn raw_value_round_trips() {
        let n: LenientNumber = serde_json::from_str("\"3 hrs\"").unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"3 hrs\"");
        assert_eq!(n.value(), 3.0);
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    }

    #[test]
    fn null_text_reads_as_empty() {
        let row: Row = serde_json::from_value(json!({"name": null})).unwrap();
        assert_eq!(row.name, "");
        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.name, "");
        let row: Row = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(row.name, "x");
    }

    proptest! {
        #[test]
        fn finite_numbers_are_identity(v in -1.0e9f64..1.0e9f64) {
            prop_assert_eq!(LenientNumber::from_f64(v).value(), v);
        }

        #[test]
        fn integer_with_unit_suffix_resolves(n in 0u32..10_000, unit in "[a-z ]{0,8}") {
            let s = format!("{n}{unit}");
            prop_assert_eq!(lenient(json!(s)), f64::from(n));
        }
    }
}
