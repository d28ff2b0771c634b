//! Site domain entities.

pub mod model;

pub use model::{Site, SiteType};
