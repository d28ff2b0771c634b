//! Stock threshold evaluation and alert management.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use packflow_core::AppResult;
use packflow_core::config::alerting::AlertingConfig;
use packflow_database::repositories::alert::{AlertRepository, NewAlert, ThresholdReading};
use packflow_entity::alert::{Alert, AlertSeverity, AlertType};

use crate::context::RequestContext;

/// Classify an on-hand quantity against its configured minimum.
///
/// At or below the minimum is critical. Above the minimum but within
/// `warning_factor` times it is a warning. Anything higher is healthy.
pub fn classify_stock_level(
    quantity: i32,
    min_threshold: i32,
    warning_factor: f64,
) -> Option<AlertSeverity> {
    if quantity <= min_threshold {
        Some(AlertSeverity::Critical)
    } else if (quantity as f64) <= (min_threshold as f64) * warning_factor {
        Some(AlertSeverity::Warning)
    } else {
        None
    }
}

/// Evaluates stock thresholds and manages the alert queue.
#[derive(Debug, Clone)]
pub struct AlertService {
    alert_repo: Arc<AlertRepository>,
    warning_factor: f64,
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(alert_repo: Arc<AlertRepository>, config: &AlertingConfig) -> Self {
        Self {
            alert_repo,
            warning_factor: config.warning_factor,
        }
    }

    /// Evaluates every enabled threshold against current on-hand stock,
    /// raising one low-stock alert per breached pair. Pairs that already
    /// have an unacknowledged low-stock alert are skipped, so repeated
    /// evaluation does not pile up duplicates.
    ///
    /// Returns the alerts raised by this pass.
    pub async fn evaluate_thresholds(&self) -> AppResult<Vec<Alert>> {
        let readings = self.alert_repo.read_enabled_thresholds().await?;
        debug!(thresholds = readings.len(), "Evaluating stock thresholds");

        let mut raised = Vec::new();
        for reading in &readings {
            let Some(severity) =
                classify_stock_level(reading.quantity, reading.min_threshold, self.warning_factor)
            else {
                continue;
            };

            if self
                .alert_repo
                .has_open_alert(
                    AlertType::LowStock,
                    reading.site_id,
                    reading.packaging_type_id,
                )
                .await?
            {
                continue;
            }

            let alert = self.raise_low_stock(reading, severity).await?;
            info!(
                alert_id = %alert.id,
                site_id = %reading.site_id,
                packaging_type_id = %reading.packaging_type_id,
                quantity = reading.quantity,
                min_threshold = reading.min_threshold,
                severity = %severity,
                "Low stock alert raised"
            );
            raised.push(alert);
        }

        Ok(raised)
    }

    /// Acknowledges an alert on behalf of the current actor.
    pub async fn acknowledge(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Alert> {
        let alert = self.alert_repo.acknowledge(id, ctx.actor_id).await?;
        info!(actor_id = %ctx.actor_id, alert_id = %id, "Alert acknowledged");
        Ok(alert)
    }

    /// Lists unacknowledged alerts, newest first.
    pub async fn unacknowledged(&self, limit: i64) -> AppResult<Vec<Alert>> {
        self.alert_repo.find_unacknowledged(limit).await
    }

    async fn raise_low_stock(
        &self,
        reading: &ThresholdReading,
        severity: AlertSeverity,
    ) -> AppResult<Alert> {
        let message = format!(
            "On-hand quantity {} is at or near the minimum threshold {}",
            reading.quantity, reading.min_threshold
        );
        self.alert_repo
            .create(&NewAlert {
                alert_type: AlertType::LowStock,
                severity,
                site_id: Some(reading.site_id),
                load_id: None,
                packaging_type_id: Some(reading.packaging_type_id),
                message: &message,
            })
            .await
    }
}
