//! Site entity model.
//!
//! Sites are reference data maintained outside the core; the core reads
//! them for load-number prefixes and farm-vs-depot timing defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kinds of locations that hold packaging inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "site_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    /// A producing farm.
    Farm,
    /// A distribution depot.
    Depot,
    /// A cold storage facility.
    ColdStore,
    /// A packhouse.
    Packhouse,
}

impl SiteType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Farm => "farm",
            Self::Depot => "depot",
            Self::ColdStore => "cold_store",
            Self::Packhouse => "packhouse",
        }
    }

    /// Whether farm default expected times apply to this site.
    pub fn is_farm(&self) -> bool {
        matches!(self, Self::Farm)
    }
}

/// A location holding packaging inventory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Site {
    /// Unique site identifier.
    pub id: Uuid,
    /// Short site code used as the load-number prefix (e.g. `BV1`).
    pub code: String,
    /// Human-readable site name.
    pub name: String,
    /// The kind of site.
    pub site_type: SiteType,
    /// Whether the site is active.
    pub is_active: bool,
    /// When the site record was created.
    pub created_at: DateTime<Utc>,
}
