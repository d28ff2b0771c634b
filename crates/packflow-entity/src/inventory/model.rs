//! Site inventory entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Current on-hand count for one (site, packaging type) pair.
///
/// Rows are created lazily on the first movement into a site and never
/// deleted. `quantity` may go negative after concurrent or erroneous
/// dispatches; that is a data-quality signal to be reconciled with a
/// manual adjustment movement, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteInventory {
    /// Unique row identifier.
    pub id: Uuid,
    /// The site holding the stock.
    pub site_id: Uuid,
    /// The packaging type counted.
    pub packaging_type_id: Uuid,
    /// Units on hand.
    pub quantity: i32,
    /// Damaged units on hand.
    pub quantity_damaged: i32,
    /// When the row was last adjusted.
    pub updated_at: DateTime<Utc>,
}
