//! Size-stock extraction
//!
//! Scans variation records and accumulates stock per discovered size label.

use super::variation::VariationDetails;
use crate::domain::value_objects::SizeStockMap;

/// Labels assigned by array position when a record carries stock but no
/// size-like attribute. Mirrors the garment-size ordering the upstream feed
/// uses for unlabeled variants; records past the end of this list are
/// skipped. Compatibility behavior — do not extend.
pub const FALLBACK_SIZE_LABELS: [&str; 7] = ["S", "M", "L", "XL", "XXL", "XXXL", "XXXXL"];

/// Builds the per-size breakdown for a product. Absent or unparseable
/// variation data yields an empty map, signalling the caller to fall back
/// to flat base stock.
pub fn extract_size_stock(details: Option<&VariationDetails>) -> SizeStockMap {
    let mut map = SizeStockMap::new();
    let Some(details) = details else { return map };
    for (index, record) in details.records().iter().enumerate() {
        if let Some(label) = record.size_label() {
            map.add(&label, record.stock());
        } else if !record.has_size_attribute() && record.carries_stock() {
            // Unlabeled variant: positional fallback, bounded by the list.
            if let Some(label) = FALLBACK_SIZE_LABELS.get(index) {
                map.add(label, record.stock());
            }
        }
        // A size-like key whose value is unusable labels nothing: the
        // record is dropped rather than guessed at.
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(value: serde_json::Value) -> VariationDetails {
        VariationDetails::from_stored(Some(value)).unwrap()
    }

    #[test]
    fn test_absent_details_yield_empty_map() {
        assert!(extract_size_stock(None).is_empty());
    }

    #[test]
    fn test_duplicate_labels_sum() {
        let d = details(json!([
            {"attributes": {"Beden": "M"}, "stok": 3},
            {"attributes": {"Beden": "M"}, "stok": 4},
        ]));
        let map = extract_size_stock(Some(&d));
        assert_eq!(map.get("M"), Some(7));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_positional_fallback_for_unlabeled_records() {
        let d = details(json!([{"stok": 12}]));
        let map = extract_size_stock(Some(&d));
        assert_eq!(map.get("S"), Some(12));

        let d = details(json!([
            {"stok": 1}, {"stok": 2}, {"stok": 3}, {"stok": 4},
            {"stok": 5}, {"stok": 6}, {"stok": 7}, {"stok": 8},
        ]));
        let map = extract_size_stock(Some(&d));
        assert_eq!(map.get("XXXXL"), Some(7));
        // Eighth record falls off the fallback list.
        assert_eq!(map.len(), 7);
        assert_eq!(map.total(), 28);
    }

    #[test]
    fn test_fallback_index_follows_array_position() {
        // A labeled record still consumes its array index: the unlabeled
        // record at index 1 gets "M", not "S".
        let d = details(json!([
            {"attributes": {"Beden": "XL"}, "stok": 2},
            {"stok": 5},
        ]));
        let map = extract_size_stock(Some(&d));
        assert_eq!(map.get("XL"), Some(2));
        assert_eq!(map.get("M"), Some(5));
    }

    #[test]
    fn test_unlabeled_record_without_stock_is_skipped() {
        let d = details(json!([{"attributes": {"Renk": "Mavi"}}]));
        assert!(extract_size_stock(Some(&d)).is_empty());
    }

    #[test]
    fn test_size_key_with_unusable_value_drops_record() {
        let d = details(json!([{"attributes": {"Beden": ""}, "stok": 9}]));
        assert!(extract_size_stock(Some(&d)).is_empty());
    }

    #[test]
    fn test_malformed_raw_string_yields_empty_map() {
        let d = details(json!("definitely not json"));
        assert!(extract_size_stock(Some(&d)).is_empty());
    }

    #[test]
    fn test_negative_stock_never_propagates() {
        let d = details(json!([
            {"attributes": {"Beden": "L"}, "stok": -5},
            {"attributes": {"Beden": "L"}, "stok": 3},
        ]));
        let map = extract_size_stock(Some(&d));
        assert_eq!(map.get("L"), Some(3));
    }
}
