//! On-time classification for depot arrival.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of an actual arrival against its expected window.
///
/// Persisted on the load at receipt time so historical loads keep the
/// classification that applied when they were confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "on_time_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OnTimeStatus {
    /// Arrived before the expected window opened.
    Early,
    /// Arrived within the expected window (including tolerance band).
    OnTime,
    /// Arrived after the expected window closed.
    Delayed,
}

impl OnTimeStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::OnTime => "on_time",
            Self::Delayed => "delayed",
        }
    }
}

impl fmt::Display for OnTimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
