//! Load lifecycle status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle states of a transport load.
///
/// The happy path is `scheduled → loading → departed → in_transit →
/// arrived_depot → completed`; `cancelled` is reachable from any
/// non-terminal state. `loading` is functionally equivalent to `scheduled`
/// for transition guards — it exists only as a pre-dispatch annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "load_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Created, no packaging has moved.
    Scheduled,
    /// Being loaded at the origin site.
    Loading,
    /// Dispatched from the origin; inventory decremented.
    Departed,
    /// On the road between sites.
    InTransit,
    /// Arrived at the destination depot, not yet counted in.
    ArrivedDepot,
    /// Received and counted; inventory incremented. Terminal.
    Completed,
    /// Cancelled before completion. Terminal.
    Cancelled,
}

impl LoadStatus {
    /// Whether the load is in a terminal state — no further timestamp or
    /// quantity field may change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the load has not yet dispatched (no inventory has moved).
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Loading)
    }

    /// Whether `dispatch` is allowed from this state.
    pub fn can_dispatch(&self) -> bool {
        self.is_pre_dispatch()
    }

    /// Whether `receive` is allowed from this state.
    pub fn can_receive(&self) -> bool {
        matches!(self, Self::Departed | Self::InTransit | Self::ArrivedDepot)
    }

    /// Whether `cancel` is allowed from this state.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Loading => "loading",
            Self::Departed => "departed",
            Self::InTransit => "in_transit",
            Self::ArrivedDepot => "arrived_depot",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoadStatus {
    type Err = packflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "loading" => Ok(Self::Loading),
            "departed" => Ok(Self::Departed),
            "in_transit" => Ok(Self::InTransit),
            "arrived_depot" => Ok(Self::ArrivedDepot),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(packflow_core::AppError::validation(format!(
                "Invalid load status: '{s}'"
            ))),
        }
    }
}
