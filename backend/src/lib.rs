//! # Inventory Backend
//!
//! A product inventory kept in memory and mirrored to a CSV file after
//! every change. The layers mirror each other:
//! - `storage` owns the file format, atomic saves and read-only mode
//! - `domain` holds the product model and the services callers use
//! - `config` decides which file to open

pub mod config;
pub mod domain;
pub mod storage;

pub use config::InventoryConfig;
pub use domain::models::product::{ProductChanges, ProductField, ProductRecord};
pub use domain::{ExportService, InventoryService};
pub use storage::csv::{CsvConnection, InventoryStore};
pub use storage::{PersistenceError, ProductStorage, StoreError, SyncStatus};

use log::info;

/// Main backend struct that wires the services to one inventory file
#[derive(Debug)]
pub struct Backend {
    pub inventory_service: InventoryService<InventoryStore>,
    pub export_service: ExportService,
}

impl Backend {
    /// Open the inventory file named by `config`. Opening never fails;
    /// problems with the file end up in the store's diagnostics.
    pub fn new(config: &InventoryConfig) -> Self {
        info!("Opening inventory at {:?}", config.data_file);
        let store = InventoryStore::open(&config.data_file);

        Self {
            inventory_service: InventoryService::new(store),
            export_service: ExportService::new(),
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        self.inventory_service.storage().diagnostics()
    }
}
