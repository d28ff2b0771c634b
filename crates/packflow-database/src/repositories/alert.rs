//! Alert and threshold repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use packflow_core::error::{AppError, ErrorKind};
use packflow_core::result::AppResult;
use packflow_entity::alert::{Alert, AlertSeverity, AlertType};

/// Data for one new alert.
#[derive(Debug, Clone)]
pub struct NewAlert<'a> {
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
    pub message: &'a str,
}

/// Insert an alert row inside the caller's transaction.
pub(crate) async fn insert_alert_on(
    conn: &mut PgConnection,
    alert: &NewAlert<'_>,
) -> AppResult<Alert> {
    sqlx::query_as::<_, Alert>(
        "INSERT INTO alerts (alert_type, severity, site_id, load_id, packaging_type_id, message) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(alert.alert_type)
    .bind(alert.severity)
    .bind(alert.site_id)
    .bind(alert.load_id)
    .bind(alert.packaging_type_id)
    .bind(alert.message)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create alert", e))
}

/// Row produced by the threshold evaluation join: one enabled threshold
/// with the current on-hand quantity (0 when no inventory row exists).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThresholdReading {
    /// The site the threshold applies to.
    pub site_id: Uuid,
    /// The packaging type the threshold applies to.
    pub packaging_type_id: Uuid,
    /// Configured minimum on-hand quantity.
    pub min_threshold: i32,
    /// Current on-hand quantity.
    pub quantity: i32,
}

/// Repository for alerts and threshold evaluation reads.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new alert repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an alert.
    pub async fn create(&self, alert: &NewAlert<'_>) -> AppResult<Alert> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        insert_alert_on(&mut conn, alert).await
    }

    /// Find an alert by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alert", e))
    }

    /// List unacknowledged alerts, newest first.
    pub async fn find_unacknowledged(&self, limit: i64) -> AppResult<Vec<Alert>> {
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE is_acknowledged = FALSE \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alerts", e))
    }

    /// Whether an unacknowledged alert of the given type already exists
    /// for a (site, packaging type) pair.
    pub async fn has_open_alert(
        &self,
        alert_type: AlertType,
        site_id: Uuid,
        packaging_type_id: Uuid,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM alerts \
             WHERE alert_type = $1 AND site_id = $2 AND packaging_type_id = $3 \
               AND is_acknowledged = FALSE",
        )
        .bind(alert_type)
        .bind(site_id)
        .bind(packaging_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check open alerts", e))?;
        Ok(count > 0)
    }

    /// Acknowledge an alert.
    ///
    /// Returns the updated alert, or `NotFound` if the alert does not
    /// exist or was already acknowledged.
    pub async fn acknowledge(&self, id: Uuid, acknowledged_by: Uuid) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET is_acknowledged = TRUE, acknowledged_by = $2, acknowledged_at = NOW() \
             WHERE id = $1 AND is_acknowledged = FALSE RETURNING *",
        )
        .bind(id)
        .bind(acknowledged_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acknowledge alert", e))?
        .ok_or_else(|| {
            AppError::not_found(format!("Alert {id} not found or already acknowledged"))
        })
    }

    /// Read every enabled threshold together with its current on-hand
    /// quantity. Pairs without an inventory row read as quantity 0.
    pub async fn read_enabled_thresholds(&self) -> AppResult<Vec<ThresholdReading>> {
        sqlx::query_as::<_, ThresholdReading>(
            "SELECT t.site_id, t.packaging_type_id, t.min_threshold, \
                    COALESCE(i.quantity, 0) AS quantity \
             FROM packaging_thresholds t \
             LEFT JOIN site_inventory i \
               ON i.site_id = t.site_id AND i.packaging_type_id = t.packaging_type_id \
             WHERE t.alert_enabled = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read thresholds", e))
    }
}
