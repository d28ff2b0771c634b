//! Alert domain entities.

pub mod model;

pub use model::{Alert, AlertSeverity, AlertType};
