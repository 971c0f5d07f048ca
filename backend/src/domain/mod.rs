//! # Domain Module
//!
//! Inventory operations on top of the storage layer: command validation,
//! logging, status reporting and JSON snapshots.

pub mod commands;
pub mod export_service;
pub mod inventory_service;
pub mod models;

pub use export_service::ExportService;
pub use inventory_service::InventoryService;
