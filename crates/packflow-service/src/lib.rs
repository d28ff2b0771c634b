//! # packflow-service
//!
//! Business logic service layer for PackFlow. Each service orchestrates
//! repositories to implement application-level use cases: the load
//! lifecycle, manual inventory ledger entries, and stock alerting.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod alert;
pub mod context;
pub mod inventory;
pub mod load;
pub mod timing;

pub use alert::AlertService;
pub use context::RequestContext;
pub use inventory::{InventoryService, RecordMovement};
pub use load::LoadService;
pub use timing::TimingEvaluator;
