//! JSON snapshots of an inventory.
//!
//! A snapshot is a JSON object keyed by product id whose values use the
//! inventory file's column names:
//!
//! ```json
//! {
//!   "P001": { "id": "P001", "nombre": "Lápiz", "cantidad": 120, "precio": 0.25 }
//! }
//! ```
//!
//! Export writes the snapshot atomically, the same way the CSV file is
//! saved. Import adds every entry through the regular add path, so an
//! entry that collides with an existing id or carries an invalid value is
//! skipped and reported rather than overwriting anything.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;

use shared::{ImportReport, InventorySnapshot, SkippedProduct};

use crate::domain::models::product::ProductRecord;
use crate::storage::csv::write_atomically;
use crate::storage::{ProductStorage, SyncStatus};

/// Export service that handles JSON snapshots
#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot of every product in `storage`
    pub fn snapshot<S: ProductStorage>(&self, storage: &S) -> InventorySnapshot {
        storage
            .list_products()
            .into_iter()
            .map(|record| (record.id().to_string(), shared::Product::from(record)))
            .collect()
    }

    /// Write a pretty-printed snapshot to `path`, returning the number of
    /// products written
    pub fn export_json<S: ProductStorage>(&self, storage: &S, path: &Path) -> Result<usize> {
        let snapshot = self.snapshot(storage);
        info!("Exporting {} products to {:?}", snapshot.len(), path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        write_atomically(path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
            writer.write_all(b"\n")
        })
        .with_context(|| format!("Failed to export inventory to {}", path.display()))?;

        Ok(snapshot.len())
    }

    /// Read a snapshot from `path` and add its products to `storage`
    pub fn import_json<S: ProductStorage>(&self, storage: &mut S, path: &Path) -> Result<ImportReport> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: InventorySnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;

        info!("Importing {} products from {:?}", snapshot.len(), path);
        let mut report = ImportReport::default();

        for (key, product) in snapshot {
            if key != product.id {
                warn!("Snapshot key '{}' holds product '{}'; using the product id", key, product.id);
            }
            let id = product.id.clone();

            let record = match ProductRecord::try_from(product) {
                Ok(record) => record,
                Err(e) => {
                    report.skipped.push(SkippedProduct {
                        id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match storage.add_product(record) {
                Ok(sync) => {
                    if let SyncStatus::Diverged(e) = sync {
                        warn!("Imported '{}' in memory only: {}", id, e);
                        report.unsynced = true;
                    }
                    report.imported.push(id);
                }
                Err(e) => report.skipped.push(SkippedProduct {
                    id,
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            "Imported {} products, skipped {}",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
