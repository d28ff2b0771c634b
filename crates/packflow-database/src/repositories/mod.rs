//! Concrete repository implementations.

pub mod alert;
pub mod inventory;
pub mod load;
pub mod packaging_type;
pub mod site;
