use log::{info, warn};

use crate::domain::commands::inventory::{
    AddProductCommand, AddProductResult, RemoveProductCommand, SearchProductsQuery,
    UpdateProductCommand,
};
use crate::domain::models::product::ProductRecord;
use crate::storage::{ProductStorage, RemoveOutcome, StoreError, SyncStatus, UpdateOutcome};

/// Service for managing the products of one inventory
#[derive(Debug)]
pub struct InventoryService<S: ProductStorage> {
    storage: S,
}

impl<S: ProductStorage> InventoryService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Add a new product
    pub fn add_product(&mut self, command: AddProductCommand) -> Result<AddProductResult, StoreError> {
        info!("Adding product: id={}, name={}", command.id, command.name);

        let product = ProductRecord::new(
            command.id,
            command.name,
            command.quantity,
            command.unit_price,
        )?;
        let sync = self.storage.add_product(product.clone())?;
        log_sync("Added", product.id(), &sync);

        Ok(AddProductResult { product, sync })
    }

    /// Update the supplied fields of a product
    pub fn update_product(&mut self, command: UpdateProductCommand) -> Result<UpdateOutcome, StoreError> {
        info!("Updating product: {}", command.id);

        let changes = command.changes();
        if changes.is_empty() {
            info!("Update of {} changes no field; saving the inventory as it is", command.id);
        }
        let outcome = self.storage.update_product(&command.id, changes)?;
        for rejected in &outcome.rejected {
            warn!("Product {}: {}", command.id, rejected);
        }
        log_sync("Updated", &command.id, &outcome.sync);

        Ok(outcome)
    }

    pub fn remove_product(&mut self, command: RemoveProductCommand) -> Result<RemoveOutcome, StoreError> {
        info!("Removing product: {}", command.id);

        let outcome = self.storage.remove_product(&command.id)?;
        log_sync("Removed", &command.id, &outcome.sync);

        Ok(outcome)
    }

    pub fn get_product(&self, id: &str) -> Option<&ProductRecord> {
        let product = self.storage.get_product(id);
        if product.is_none() {
            info!("Product not found: {}", id);
        }
        product
    }

    pub fn list_products(&self) -> Vec<&ProductRecord> {
        self.storage.list_products()
    }

    pub fn search_products(&self, query: &SearchProductsQuery) -> Vec<&ProductRecord> {
        let found = self.storage.search_products(&query.text);
        info!("Search '{}' matched {} products", query.text, found.len());
        found
    }

    /// Snapshot of the store's state for status displays
    pub fn status(&self) -> shared::StoreStatus {
        shared::StoreStatus {
            data_file: self.storage.location().display().to_string(),
            read_only: self.storage.is_read_only(),
            record_count: self.storage.list_products().len(),
            diagnostics: self.storage.diagnostics().to_vec(),
        }
    }
}

fn log_sync(action: &str, id: &str, sync: &SyncStatus) {
    match sync.warning() {
        None => info!("{} product {}", action, id),
        Some(e) => warn!("{} product {} in memory only: {}", action, id, e),
    }
}
