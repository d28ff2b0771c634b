//! Packaging type catalog entities.

pub mod model;

pub use model::PackagingType;
