use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product as exchanged with front ends and JSON snapshots.
///
/// Field names on the wire follow the columns of the inventory file
/// (`id,nombre,cantidad,precio`). The quantity is signed here so that a
/// snapshot carrying a negative value can be read and then rejected by the
/// backend instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    /// Unit price with two decimal digits of precision
    #[serde(rename = "precio")]
    pub unit_price: f64,
}

/// A whole inventory keyed by product id, as written by `inventory export`.
pub type InventorySnapshot = BTreeMap<String, Product>;

/// State of an opened inventory file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Path of the backing CSV file
    pub data_file: String,
    /// True once a write was refused for lack of permissions
    pub read_only: bool,
    pub record_count: usize,
    /// Rows skipped while loading, one message per row
    pub diagnostics: Vec<String>,
}

/// A snapshot entry that could not be imported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedProduct {
    pub id: String,
    pub reason: String,
}

/// Outcome of importing a JSON snapshot into a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Ids added to the store, in snapshot order
    pub imported: Vec<String>,
    pub skipped: Vec<SkippedProduct>,
    /// Set when at least one import was kept in memory but not saved to disk
    pub unsynced: bool,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && !self.unsynced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_uses_file_column_names() {
        let product = Product {
            id: "P001".to_string(),
            name: "Lápiz".to_string(),
            quantity: 120,
            unit_price: 0.25,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["nombre"], "Lápiz");
        assert_eq!(json["cantidad"], 120);
        assert_eq!(json["precio"], 0.25);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_snapshot_is_keyed_by_id() {
        let raw = r#"{
            "P002": {"id": "P002", "nombre": "Cuaderno", "cantidad": 50, "precio": 1.8},
            "P001": {"id": "P001", "nombre": "Lápiz", "cantidad": 120, "precio": 0.25}
        }"#;

        let snapshot: InventorySnapshot = serde_json::from_str(raw).unwrap();
        let ids: Vec<&String> = snapshot.keys().collect();
        assert_eq!(ids, vec!["P001", "P002"]);
        assert_eq!(snapshot["P002"].quantity, 50);
    }

    #[test]
    fn test_import_report_is_clean_only_without_skips_or_divergence() {
        let mut report = ImportReport::default();
        assert!(report.is_clean());

        report.unsynced = true;
        assert!(!report.is_clean());

        report.unsynced = false;
        report.skipped.push(SkippedProduct {
            id: "X".to_string(),
            reason: "duplicate".to_string(),
        });
        assert!(!report.is_clean());
    }
}
