//! Inventory ledger domain entities.

pub mod model;
pub mod movement;

pub use model::SiteInventory;
pub use movement::{MovementDirection, MovementType, PackagingMovement};
