//! # CSV Storage Module
//!
//! File-based product storage. An inventory lives in a single CSV file with
//! the header `id,nombre,cantidad,precio`; the whole file is rewritten
//! through a temp file and an atomic rename after every change.

pub mod connection;
pub mod product_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::{write_atomically, CsvConnection, HEADER};
pub use product_repository::{InventoryStore, RowError};
