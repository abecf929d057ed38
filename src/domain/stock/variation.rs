//! Variation-details normalization
//!
//! Marketplace syncs deliver the variation breakdown in whatever shape the
//! upstream happened to store: an already-parsed array, a JSON-encoded string,
//! or junk. Everything stringly-typed about that field is resolved here, so
//! the extractor only ever sees a list of records.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw variation-details field as found in a product payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum VariationDetails {
    Parsed(Vec<VariationRecord>),
    Raw(String),
    Other(Value),
}

/// One SKU-level entry: an arbitrary attribute bag plus a stock count.
/// Deliberately lenient — both fields are optional and the stock value can
/// be any JSON type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct VariationRecord {
    pub attributes: BTreeMap<String, Value>,
    #[serde(alias = "stock")]
    pub stok: Value,
}

impl VariationDetails {
    /// Resolves the union to a record list. A `Raw` string that fails to
    /// parse yields an empty list: malformed backend data degrades to the
    /// base-stock path, never an error.
    pub fn records(&self) -> Vec<VariationRecord> {
        match self {
            Self::Parsed(records) => records.clone(),
            Self::Raw(text) => serde_json::from_str(text).unwrap_or_default(),
            Self::Other(_) => Vec::new(),
        }
    }

    /// Lifts a stored JSONB column into the union. `NULL` and unusable
    /// values map to `None`, which callers treat as "no size breakdown".
    pub fn from_stored(value: Option<Value>) -> Option<Self> {
        match value {
            None | Some(Value::Null) => None,
            Some(v) => serde_json::from_value(v).ok(),
        }
    }
}

impl VariationRecord {
    /// Size label from the first attribute whose key names a size
    /// ("beden" or "size", any casing). Values that are not non-empty
    /// strings yield no label.
    pub fn size_label(&self) -> Option<String> {
        self.attributes.iter().find_map(|(key, value)| {
            if !is_size_key(key) { return None; }
            let label = value.as_str()?.trim();
            if label.is_empty() { None } else { Some(label.to_string()) }
        })
    }

    pub fn has_size_attribute(&self) -> bool {
        self.attributes.keys().any(|k| is_size_key(k))
    }

    /// Whether the record carries a stock value at all, regardless of type.
    pub fn carries_stock(&self) -> bool { !self.stok.is_null() }

    /// Stock count with backend quirks flattened away: negatives and
    /// non-numeric values become 0, numeric strings are accepted.
    pub fn stock(&self) -> u32 { coerce_stock(&self.stok) }
}

fn is_size_key(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("beden") || key.contains("size")
}

fn coerce_stock(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.min(u32::MAX as u64) as u32
            } else {
                n.as_f64().map_or(0, clamp_float)
            }
        }
        Value::String(s) => s.trim().parse::<f64>().map_or(0, clamp_float),
        _ => 0,
    }
}

fn clamp_float(f: f64) -> u32 {
    if f.is_finite() && f > 0.0 { f as u32 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_string_parses() {
        let details = VariationDetails::Raw(r#"[{"attributes":{"Beden":"M"},"stok":5}]"#.into());
        let records = details.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size_label().as_deref(), Some("M"));
        assert_eq!(records[0].stock(), 5);
    }

    #[test]
    fn test_malformed_raw_string_yields_empty() {
        let details = VariationDetails::Raw("{not json".into());
        assert!(details.records().is_empty());
    }

    #[test]
    fn test_from_stored_handles_all_shapes() {
        assert!(VariationDetails::from_stored(None).is_none());
        assert!(VariationDetails::from_stored(Some(Value::Null)).is_none());
        let parsed = VariationDetails::from_stored(Some(json!([{"stok": 2}]))).unwrap();
        assert_eq!(parsed.records().len(), 1);
        let raw = VariationDetails::from_stored(Some(json!("[{\"stok\":1}]"))).unwrap();
        assert_eq!(raw.records().len(), 1);
        // Non-array, non-string JSON is kept but resolves to no records.
        let other = VariationDetails::from_stored(Some(json!(42))).unwrap();
        assert!(other.records().is_empty());
    }

    #[test]
    fn test_size_key_match_is_substring_and_case_insensitive() {
        let record: VariationRecord =
            serde_json::from_value(json!({"attributes": {"Ürün Bedeni": "XL"}, "stok": 1})).unwrap();
        assert_eq!(record.size_label().as_deref(), Some("XL"));
        let record: VariationRecord =
            serde_json::from_value(json!({"attributes": {"SIZE": " 38 "}, "stok": 1})).unwrap();
        assert_eq!(record.size_label().as_deref(), Some("38"));
        let record: VariationRecord =
            serde_json::from_value(json!({"attributes": {"Renk": "Mavi"}, "stok": 1})).unwrap();
        assert!(record.size_label().is_none());
        assert!(!record.has_size_attribute());
    }

    #[test]
    fn test_empty_size_value_gives_no_label_but_key_counts() {
        let record: VariationRecord =
            serde_json::from_value(json!({"attributes": {"Beden": "  "}, "stok": 4})).unwrap();
        assert!(record.size_label().is_none());
        assert!(record.has_size_attribute());
    }

    #[test]
    fn test_stock_coercion() {
        let cases = [
            (json!(7), 7u32),
            (json!(-3), 0),
            (json!(2.9), 2),
            (json!("12"), 12),
            (json!("many"), 0),
            (json!(null), 0),
            (json!({"n": 1}), 0),
        ];
        for (value, expected) in cases {
            assert_eq!(coerce_stock(&value), expected, "value {value}");
        }
    }

    #[test]
    fn test_missing_stock_field_is_zero_and_absent() {
        let record: VariationRecord =
            serde_json::from_value(json!({"attributes": {"Beden": "S"}})).unwrap();
        assert_eq!(record.stock(), 0);
        assert!(!record.carries_stock());
    }
}
