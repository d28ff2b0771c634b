//! Expected-time defaults for the timing evaluator.
//!
//! The farm default times are configuration injected into the evaluator;
//! per-load overrides take precedence.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default expected times and tolerances used when a load carries no
/// per-load override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Default expected farm arrival time of day (`"HH:MM"`).
    #[serde(default = "default_farm_arrival")]
    pub farm_arrival_time: String,
    /// Default expected farm departure time of day (`"HH:MM"`).
    #[serde(default = "default_farm_departure")]
    pub farm_departure_time: String,
    /// Tolerance band in minutes for the on-time classification of
    /// dispatch and depot arrival comparisons.
    #[serde(default = "default_tolerance")]
    pub on_time_tolerance_minutes: i64,
}

impl TimingConfig {
    /// Parse the configured default farm arrival time.
    pub fn farm_arrival(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.farm_arrival_time)
    }

    /// Parse the configured default farm departure time.
    pub fn farm_departure(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.farm_departure_time)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            farm_arrival_time: default_farm_arrival(),
            farm_departure_time: default_farm_departure(),
            on_time_tolerance_minutes: default_tolerance(),
        }
    }
}

/// Parse an `"HH:MM"` (or `"HH:MM:SS"`) time-of-day string.
fn parse_time_of_day(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| {
            AppError::configuration(format!("Invalid time of day '{value}': {e}"))
        })
}

fn default_farm_arrival() -> String {
    "14:00".to_string()
}

fn default_farm_departure() -> String {
    "17:00".to_string()
}

fn default_tolerance() -> i64 {
    5
}
