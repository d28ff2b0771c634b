//! Packaging type catalog model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A category of reusable container tracked by count (crate, bin, box,
/// pallet). Catalog maintenance lives outside the core; the core only
/// checks existence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PackagingType {
    /// Unique packaging type identifier.
    pub id: Uuid,
    /// Short code (e.g. `CRT-20`).
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the type is active.
    pub is_active: bool,
    /// When the catalog entry was created.
    pub created_at: DateTime<Utc>,
}
