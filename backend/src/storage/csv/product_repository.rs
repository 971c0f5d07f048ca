//! # CSV Inventory Store
//!
//! Keeps every product of an inventory file in memory and rewrites the
//! whole file after each change.
//!
//! ## CSV Format
//!
//! ```csv
//! id,nombre,cantidad,precio
//! P001,Lápiz,120,0.25
//! P002,Cuaderno,50,1.80
//! ```
//!
//! ## Loading
//!
//! - A missing file is created with the header row.
//! - A header that differs from the one above leaves the store empty and
//!   records one diagnostic.
//! - A row that cannot be parsed is skipped with a diagnostic
//!   `row <n>: <reason>, skipped`; loading carries on with the next row.
//!   `<n>` counts CSV records with the header as row 1, so a quoted name
//!   spanning two lines still counts once.
//! - A repeated id replaces the earlier row.
//! - A zero-byte file gets its header written back.
//!
//! ## Saving
//!
//! Every change is saved through a temp file renamed over the target. A
//! failed save never undoes the in-memory change; it is reported as
//! [`SyncStatus::Diverged`]. Permission errors switch the store to
//! read-only mode for the rest of its life.

use csv::StringRecord;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;

use super::connection::{CsvConnection, HEADER};
use crate::domain::models::product::{InvalidValue, ProductChanges, ProductRecord};
use crate::storage::error::{PersistenceError, StoreError, SyncStatus};
use crate::storage::traits::{ProductStorage, RemoveOutcome, UpdateOutcome};

/// Why a data row was skipped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("empty id")]
    EmptyId,

    #[error("expected 4 fields, found {0}")]
    TooManyFields(usize),

    #[error("quantity '{0}' is not an integer")]
    InvalidQuantity(String),

    #[error("price '{0}' is not a number")]
    InvalidPrice(String),

    #[error(transparent)]
    Rejected(#[from] InvalidValue),
}

/// File-backed inventory of products keyed by id
#[derive(Debug)]
pub struct InventoryStore {
    connection: CsvConnection,
    products: BTreeMap<String, ProductRecord>,
    read_only: bool,
    diagnostics: Vec<String>,
}

impl InventoryStore {
    /// Open the inventory at `path`, creating it if needed.
    ///
    /// Never fails: file problems show up as read-only mode or as
    /// diagnostics, and the store starts with whatever could be loaded.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut store = Self {
            connection: CsvConnection::new(path),
            products: BTreeMap::new(),
            read_only: false,
            diagnostics: Vec::new(),
        };

        store.prepare_file();
        store.load();

        info!(
            "Loaded {} products from {:?} ({} diagnostics, read-only: {})",
            store.products.len(),
            store.connection.file_path(),
            store.diagnostics.len(),
            store.read_only
        );
        store
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn prepare_file(&mut self) {
        match self.connection.ensure_file_exists() {
            Ok(true) => info!("Created inventory file {:?}", self.connection.file_path()),
            Ok(false) => {}
            Err(e) => {
                warn!(
                    "Could not create inventory file {:?}: {}. Continuing in read-only mode.",
                    self.connection.file_path(),
                    e
                );
                self.read_only = true;
            }
        }
    }

    fn load(&mut self) {
        let mut reader = match self.connection.open_reader() {
            Ok(reader) => reader,
            Err(e) => {
                self.handle_read_failure(e);
                return;
            }
        };

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                self.diagnostics
                    .push(format!("could not read header: {}; file contents ignored", e));
                return;
            }
        };

        if headers.is_empty() {
            self.repair_header();
            return;
        }

        if !header_matches(&headers) {
            let found: Vec<&str> = headers.iter().collect();
            self.diagnostics.push(format!(
                "header mismatch: expected '{}', found '{}'; file contents ignored",
                HEADER.join(","),
                found.join(",")
            ));
            return;
        }

        for (index, result) in reader.records().enumerate() {
            // rows are counted, not lines: the header is row 1 and a quoted
            // cell spanning several lines still makes a single row
            let row = index + 2;

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let is_io = matches!(e.kind(), csv::ErrorKind::Io(_));
                    self.diagnostics.push(format!("row {}: {}, skipped", row, e));
                    if is_io {
                        // the reader cannot make progress past an I/O error
                        break;
                    }
                    continue;
                }
            };

            match parse_row(&record) {
                Ok(product) => {
                    let id = product.id().to_string();
                    if self.products.insert(id.clone(), product).is_some() {
                        warn!("Row {} repeats id '{}'; keeping the later row", row, id);
                    }
                }
                Err(reason) => {
                    debug!("Skipping row {}: {}", row, reason);
                    self.diagnostics
                        .push(format!("row {}: {}, skipped", row, reason));
                }
            }
        }
    }

    fn handle_read_failure(&mut self, e: io::Error) {
        let path = self.connection.file_path();
        if self.read_only && !path.exists() {
            // creation already failed; there is nothing to read
            return;
        }

        if e.kind() == io::ErrorKind::PermissionDenied {
            warn!("No permission to read {:?}. Continuing in read-only mode.", path);
            self.read_only = true;
        } else {
            error!("Could not read {:?}: {}", path, e);
        }
        self.diagnostics
            .push(format!("could not read {}: {}", path.display(), e));
    }

    fn repair_header(&mut self) {
        if self.read_only {
            return;
        }
        match self.persist() {
            Ok(()) => info!("Wrote missing header to {:?}", self.connection.file_path()),
            Err(e) => warn!("Could not write header: {}", e),
        }
    }

    /// Write the full mapping to disk.
    fn persist(&mut self) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::ReadOnly {
                path: self.connection.file_path().to_path_buf(),
            });
        }

        let result = self.connection.write_products(self.products.values());
        if let Err(e) = &result {
            self.note_failure(e);
        }
        result
    }

    fn note_failure(&mut self, e: &PersistenceError) {
        if e.is_access_denied() && !self.read_only {
            warn!(
                "Permission denied writing {:?}; switching to read-only mode",
                self.connection.file_path()
            );
            self.read_only = true;
        }
    }

    /// Persist after a change that is already applied in memory.
    fn sync(&mut self, action: &str) -> SyncStatus {
        match self.persist() {
            Ok(()) => {
                debug!("Saved {} products after {}", self.products.len(), action);
                SyncStatus::Synced
            }
            Err(e) => {
                error!("{} applied in memory but not saved: {}", action, e);
                SyncStatus::Diverged(e)
            }
        }
    }
}

impl ProductStorage for InventoryStore {
    fn add_product(&mut self, record: ProductRecord) -> Result<SyncStatus, StoreError> {
        if self.products.contains_key(record.id()) {
            warn!("Refusing to add duplicate product id '{}'", record.id());
            return Err(StoreError::DuplicateKey {
                id: record.id().to_string(),
            });
        }

        let id = record.id().to_string();
        self.products.insert(id.clone(), record);
        Ok(self.sync(&format!("adding '{}'", id)))
    }

    fn update_product(&mut self, id: &str, changes: ProductChanges) -> Result<UpdateOutcome, StoreError> {
        let record = self
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let mut applied = 0;
        let mut rejected = Vec::new();

        if let Some(name) = changes.name {
            record.set_name(name);
            applied += 1;
        }
        if let Some(quantity) = changes.quantity {
            match record.set_quantity(quantity) {
                Ok(()) => applied += 1,
                Err(e) => rejected.push(e),
            }
        }
        if let Some(unit_price) = changes.unit_price {
            match record.set_unit_price(unit_price) {
                Ok(()) => applied += 1,
                Err(e) => rejected.push(e),
            }
        }

        if applied == 0 && !rejected.is_empty() {
            warn!("Update of '{}' rejected: {:?}", id, rejected);
            return Err(StoreError::InvalidValue(rejected));
        }

        let record = record.clone();
        let sync = self.sync(&format!("updating '{}'", id));
        Ok(UpdateOutcome {
            record,
            rejected,
            sync,
        })
    }

    fn remove_product(&mut self, id: &str) -> Result<RemoveOutcome, StoreError> {
        let removed = self
            .products
            .remove(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let sync = self.sync(&format!("removing '{}'", id));
        Ok(RemoveOutcome { removed, sync })
    }

    fn get_product(&self, id: &str) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    fn list_products(&self) -> Vec<&ProductRecord> {
        self.products.values().collect()
    }

    fn search_products(&self, text: &str) -> Vec<&ProductRecord> {
        let needle = text.to_lowercase();
        self.products
            .values()
            .filter(|p| p.name().to_lowercase().contains(&needle))
            .collect()
    }

    fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn location(&self) -> &Path {
        self.connection.file_path()
    }
}

fn header_matches(headers: &StringRecord) -> bool {
    headers.len() == HEADER.len()
        && headers
            .iter()
            .zip(HEADER.iter())
            .all(|(found, expected)| found == *expected)
}

/// Parse one data row. Missing trailing cells count as blank and blank
/// numeric cells as zero.
fn parse_row(record: &StringRecord) -> Result<ProductRecord, RowError> {
    if record.len() > HEADER.len() {
        return Err(RowError::TooManyFields(record.len()));
    }

    let cell = |index: usize| record.get(index).unwrap_or("").trim();

    let id = cell(0);
    if id.is_empty() {
        return Err(RowError::EmptyId);
    }

    let quantity = match cell(2) {
        "" => 0,
        raw => raw
            .parse::<i64>()
            .map_err(|_| RowError::InvalidQuantity(raw.to_string()))?,
    };

    let unit_price = match cell(3) {
        "" => 0.0,
        raw => raw
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .ok_or_else(|| RowError::InvalidPrice(raw.to_string()))?,
    };

    Ok(ProductRecord::new(id, cell(1), quantity, unit_price)?)
}
