//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Kinds of generated alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Packaging went missing on a received load.
    MissingPackaging,
    /// On-hand stock crossed a configured minimum threshold.
    LowStock,
}

impl AlertType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingPackaging => "missing_packaging",
            Self::LowStock => "low_stock",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a generated alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Requires immediate attention.
    Critical,
    /// Should be looked at soon.
    Warning,
    /// Informational only.
    Info,
}

impl AlertSeverity {
    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated notification about stock or shipment problems.
///
/// Created by the threshold evaluator or the receipt transition; mutated
/// only by acknowledgement, never auto-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// The kind of alert.
    pub alert_type: AlertType,
    /// Severity classification.
    pub severity: AlertSeverity,
    /// The site concerned, if any.
    pub site_id: Option<Uuid>,
    /// The load concerned, if any.
    pub load_id: Option<Uuid>,
    /// The packaging type concerned, if any.
    pub packaging_type_id: Option<Uuid>,
    /// Human-readable description.
    pub message: String,
    /// Whether the alert has been acknowledged.
    pub is_acknowledged: bool,
    /// The actor who acknowledged the alert.
    pub acknowledged_by: Option<Uuid>,
    /// When the alert was acknowledged.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
}
