//! Stock threshold alerting configuration.

use serde::{Deserialize, Serialize};

/// Settings for the periodic low-stock threshold evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Whether the periodic threshold sweep runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Interval between threshold sweeps, in seconds.
    #[serde(default = "default_interval")]
    pub evaluation_interval_seconds: u64,
    /// Multiplier above the minimum threshold that still produces a
    /// warning alert (quantity <= factor * min_threshold).
    #[serde(default = "default_warning_factor")]
    pub warning_factor: f64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            evaluation_interval_seconds: default_interval(),
            warning_factor: default_warning_factor(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}

fn default_warning_factor() -> f64 {
    1.2
}
