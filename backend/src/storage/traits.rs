//! # Storage Traits
//!
//! The storage abstraction the domain layer works against. Operations are
//! synchronous and mutating ones take `&mut self`: a store serves a single
//! caller, and callers that share one across threads put it behind a
//! `Mutex` for the whole read-modify-save sequence.

use std::path::Path;

use super::error::{StoreError, SyncStatus};
use crate::domain::models::product::{InvalidValue, ProductChanges, ProductRecord};

/// Result of a successful update
#[derive(Debug)]
pub struct UpdateOutcome {
    /// The record after the update
    pub record: ProductRecord,
    /// Fields whose new value was rejected; the other fields were still applied
    pub rejected: Vec<InvalidValue>,
    pub sync: SyncStatus,
}

/// Result of a successful removal
#[derive(Debug)]
pub struct RemoveOutcome {
    pub removed: ProductRecord,
    pub sync: SyncStatus,
}

/// Trait defining the interface for product storage operations
pub trait ProductStorage {
    /// Insert a new product. Fails with `DuplicateKey` without touching the
    /// existing record or the file.
    fn add_product(&mut self, record: ProductRecord) -> Result<SyncStatus, StoreError>;

    /// Apply the supplied fields independently. Fails with `NotFound` for an
    /// unknown id, and with `InvalidValue` only when every supplied field
    /// was rejected.
    fn update_product(&mut self, id: &str, changes: ProductChanges) -> Result<UpdateOutcome, StoreError>;

    /// Delete a product. Fails with `NotFound` for an unknown id.
    fn remove_product(&mut self, id: &str) -> Result<RemoveOutcome, StoreError>;

    fn get_product(&self, id: &str) -> Option<&ProductRecord>;

    /// All products ordered by id
    fn list_products(&self) -> Vec<&ProductRecord>;

    /// Products whose name contains `text`, ignoring case
    fn search_products(&self, text: &str) -> Vec<&ProductRecord>;

    /// Messages about rows skipped while loading
    fn diagnostics(&self) -> &[String];

    fn is_read_only(&self) -> bool;

    /// Path of the backing file
    fn location(&self) -> &Path;
}
