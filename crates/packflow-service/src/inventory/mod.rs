//! Manual inventory ledger service.

pub mod service;

pub use service::{InventoryService, RecordMovement};
