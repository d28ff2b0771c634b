//! Load packaging line entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One packaging-type quantity within a load.
///
/// `quantity_received`, `quantity_damaged` and `quantity_missing` are
/// written exactly once, at receipt confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoadPackagingLine {
    /// Unique line identifier.
    pub id: Uuid,
    /// Owning load.
    pub load_id: Uuid,
    /// The packaging type being moved.
    pub packaging_type_id: Uuid,
    /// Units dispatched from the origin (always > 0).
    pub quantity_dispatched: i32,
    /// Units counted in at the destination; null until receipt.
    pub quantity_received: Option<i32>,
    /// Units received damaged.
    pub quantity_damaged: i32,
    /// Units unaccounted for at receipt.
    pub quantity_missing: i32,
    /// Optional product/variety/grade reference.
    pub product_reference: Option<String>,
    /// Free-form line notes.
    pub notes: Option<String>,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
}

impl LoadPackagingLine {
    /// Whether this line's counts disagree with what was dispatched.
    pub fn has_discrepancy(&self) -> bool {
        self.quantity_received
            .map(|received| received != self.quantity_dispatched)
            .unwrap_or(false)
            || self.quantity_damaged > 0
            || self.quantity_missing > 0
    }
}

/// Data required to create a packaging line with a new load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoadLine {
    /// The packaging type being moved.
    pub packaging_type_id: Uuid,
    /// Units to dispatch; must be > 0.
    pub quantity_dispatched: i32,
    /// Optional product/variety/grade reference.
    pub product_reference: Option<String>,
    /// Free-form line notes.
    pub notes: Option<String>,
}

/// Caller-supplied counts for one line at receipt confirmation.
///
/// Lines of the load not mentioned by the caller default to fully
/// received as dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLineInput {
    /// Identifies the line by its packaging type.
    pub packaging_type_id: Uuid,
    /// Units counted in at the destination.
    pub quantity_received: i32,
    /// Units received damaged.
    #[serde(default)]
    pub quantity_damaged: i32,
    /// Units unaccounted for.
    #[serde(default)]
    pub quantity_missing: i32,
    /// Free-form line notes.
    pub notes: Option<String>,
}
