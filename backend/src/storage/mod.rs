//! # Storage Module
//!
//! Persistence for the inventory. The domain layer talks to the
//! [`ProductStorage`] trait; [`csv::InventoryStore`] is the file-backed
//! implementation.

pub mod csv;
pub mod error;
pub mod traits;

pub use error::{PersistenceError, StoreError, SyncStatus};
pub use traits::{ProductStorage, RemoveOutcome, UpdateOutcome};
