//! Value objects for stock computation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// SKU (Stock Keeping Unit) value object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, SkuError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > 50 { return Err(SkuError::TooLong); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone)] pub enum SkuError { Empty, TooLong }
impl std::error::Error for SkuError {}
impl fmt::Display for SkuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "SKU empty"), Self::TooLong => write!(f, "SKU too long") }
    }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    /// Clamps a flat stock count from the backend: absent or negative becomes zero.
    pub fn from_base(value: Option<i64>) -> Self {
        Self(value.unwrap_or(0).clamp(0, u32::MAX as i64) as u32)
    }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

impl Default for Quantity { fn default() -> Self { Self(0) } }

/// Per-size inventory breakdown derived from variation records.
///
/// Derived data only: recomputed from the raw variation blob on every read,
/// never stored back. Labels are trimmed and case-preserved as first seen,
/// duplicate labels accumulate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStockMap(BTreeMap<String, u32>);

impl SizeStockMap {
    pub fn new() -> Self { Self::default() }

    /// Adds stock for a size label, creating the entry if new. Labels that
    /// trim to empty are dropped.
    pub fn add(&mut self, label: &str, stock: u32) {
        let label = label.trim();
        if label.is_empty() { return; }
        let entry = self.0.entry(label.to_string()).or_insert(0);
        *entry = entry.saturating_add(stock);
    }

    pub fn total(&self) -> u32 {
        self.0.values().fold(0u32, |acc, v| acc.saturating_add(*v))
    }

    pub fn any_positive(&self) -> bool { self.0.values().any(|v| *v > 0) }
    pub fn get(&self, label: &str) -> Option<u32> { self.0.get(label).copied() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_sku() { let sku = Sku::new("prod-001").unwrap(); assert_eq!(sku.as_str(), "PROD-001"); }
    #[test]
    fn test_quantity_from_base() {
        assert_eq!(Quantity::from_base(Some(7)).value(), 7);
        assert_eq!(Quantity::from_base(Some(-3)).value(), 0);
        assert_eq!(Quantity::from_base(None).value(), 0);
    }
    #[test]
    fn test_map_sums_duplicate_labels() {
        let mut map = SizeStockMap::new();
        map.add("M", 3);
        map.add("M", 4);
        assert_eq!(map.get("M"), Some(7));
        assert_eq!(map.total(), 7);
        assert_eq!(map.len(), 1);
    }
    #[test]
    fn test_map_trims_but_preserves_case() {
        let mut map = SizeStockMap::new();
        map.add(" xl ", 2);
        map.add("XL", 1);
        map.add("  ", 9);
        assert_eq!(map.get("xl"), Some(2));
        assert_eq!(map.get("XL"), Some(1));
        assert_eq!(map.len(), 2);
    }
    #[test]
    fn test_zero_entries_count_as_present() {
        let mut map = SizeStockMap::new();
        map.add("S", 0);
        assert!(!map.is_empty());
        assert!(!map.any_positive());
        assert_eq!(map.total(), 0);
    }
}
