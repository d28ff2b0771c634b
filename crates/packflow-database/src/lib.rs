//! # packflow-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all PackFlow entities. Lifecycle mutations that
//! touch multiple tables run inside a single sqlx transaction owned by
//! the repository method.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
