//! # packflow-entity
//!
//! Domain entity models for PackFlow. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod alert;
pub mod inventory;
pub mod load;
pub mod packaging;
pub mod site;
