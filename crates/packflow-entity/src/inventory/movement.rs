//! Packaging movement ledger entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// The business reason for a ledger entry.
///
/// `Dispatch` and `Receipt` are written by load transitions; the rest are
/// manual entry points following the same upsert-with-add contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Units left the origin site with a load.
    Dispatch,
    /// Units were counted in at the destination site.
    Receipt,
    /// Manual correction after a physical recount.
    Adjustment,
    /// New packaging purchased into a site.
    Purchase,
    /// Packaging scrapped out of circulation.
    Disposal,
    /// Units reclassified as damaged.
    Damage,
    /// Damaged units repaired back into circulation.
    Repair,
    /// Units written off as lost.
    Loss,
}

impl MovementType {
    /// Whether this type is written by a load transition rather than a
    /// manual entry.
    pub fn is_load_driven(&self) -> bool {
        matches!(self, Self::Dispatch | Self::Receipt)
    }

    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatch => "dispatch",
            Self::Receipt => "receipt",
            Self::Adjustment => "adjustment",
            Self::Purchase => "purchase",
            Self::Disposal => "disposal",
            Self::Damage => "damage",
            Self::Repair => "repair",
            Self::Loss => "loss",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a movement relative to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_direction", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    /// Stock entering the site.
    In,
    /// Stock leaving the site.
    Out,
}

impl MovementDirection {
    /// Derive the direction from the sign of a manually supplied quantity.
    pub fn from_signed_quantity(quantity: i32) -> Self {
        if quantity < 0 { Self::Out } else { Self::In }
    }

    /// The signed delta this direction applies to on-hand stock.
    pub fn signed(&self, quantity: i32) -> i32 {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
        }
    }

    /// Return the direction as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable, append-only ledger entry.
///
/// Every `SiteInventory` mutation has exactly one corresponding movement
/// row; movements are never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PackagingMovement {
    /// Unique movement identifier.
    pub id: Uuid,
    /// The business reason for the entry.
    pub movement_type: MovementType,
    /// Direction relative to the site.
    pub direction: MovementDirection,
    /// The site whose stock changed.
    pub site_id: Uuid,
    /// The packaging type moved.
    pub packaging_type_id: Uuid,
    /// Units moved; always positive, direction carries the sign.
    pub quantity: i32,
    /// Damaged-unit delta applied alongside the quantity.
    pub quantity_damaged: i32,
    /// The load that caused this entry, if load-driven.
    pub load_id: Option<Uuid>,
    /// The actor who recorded the entry.
    pub recorded_by: Uuid,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl PackagingMovement {
    /// The signed on-hand delta this movement applied.
    pub fn signed_quantity(&self) -> i32 {
        self.direction.signed(self.quantity)
    }
}
