//! Load repository implementation.
//!
//! Lifecycle transitions that touch the load, its lines, the movement
//! ledger, and on-hand stock are single transactions: the status guard is
//! part of the transition UPDATE itself, so two concurrent calls cannot
//! both succeed, and zero affected rows after an existence check means
//! "already transitioned", never a silent no-op.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use packflow_core::error::{AppError, ErrorKind};
use packflow_core::result::AppResult;
use packflow_entity::alert::{AlertSeverity, AlertType};
use packflow_entity::inventory::{MovementDirection, MovementType};
use packflow_entity::load::{
    CreateLoad, Load, LoadPackagingLine, LoadWithLines, OnTimeStatus, ReceiptPlan, UpdateLoad,
    next_load_number,
};

use super::alert::{NewAlert, insert_alert_on};
use super::inventory::{NewMovement, apply_movement_on};

/// Repository for load lifecycle persistence.
#[derive(Debug, Clone)]
pub struct LoadRepository {
    pool: PgPool,
}

impl LoadRepository {
    /// Create a new load repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a load by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Load>> {
        sqlx::query_as::<_, Load>("SELECT * FROM loads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find load", e))
    }

    /// Find a load with its packaging lines.
    pub async fn find_with_lines(&self, id: Uuid) -> AppResult<Option<LoadWithLines>> {
        let Some(load) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let lines = sqlx::query_as::<_, LoadPackagingLine>(
            "SELECT * FROM load_packaging_lines WHERE load_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load lines", e))?;

        Ok(Some(LoadWithLines { load, lines }))
    }

    /// Create a load with its lines, generating the load number inside
    /// the insert transaction.
    ///
    /// The number is the bare `prefix` when unused, otherwise the numeric
    /// suffix of the lexicographically-highest existing number with that
    /// prefix, incremented. The unique constraint on `load_number` turns
    /// a lost race into a `Conflict` instead of a duplicate.
    pub async fn create(
        &self,
        data: &CreateLoad,
        prefix: &str,
        created_by: Uuid,
    ) -> AppResult<LoadWithLines> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let highest: Option<String> = sqlx::query_scalar(
            "SELECT load_number FROM loads WHERE load_number LIKE $1 \
             ORDER BY load_number DESC LIMIT 1",
        )
        .bind(format!("{prefix}%"))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read load numbers", e)
        })?;

        let load_number = next_load_number(prefix, highest.as_deref());

        let load = sqlx::query_as::<_, Load>(
            "INSERT INTO loads \
             (load_number, origin_site_id, destination_site_id, channel_id, vehicle_id, driver_id, \
              dispatch_date, scheduled_departure_time, expected_farm_arrival_time, \
              expected_farm_departure_time, expected_arrival_window_start, \
              expected_arrival_window_end, estimated_arrival_time, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(&load_number)
        .bind(data.origin_site_id)
        .bind(data.destination_site_id)
        .bind(data.channel_id)
        .bind(data.vehicle_id)
        .bind(data.driver_id)
        .bind(data.dispatch_date)
        .bind(data.scheduled_departure_time)
        .bind(data.expected_farm_arrival_time)
        .bind(data.expected_farm_departure_time)
        .bind(data.expected_arrival_window_start)
        .bind(data.expected_arrival_window_end)
        .bind(data.estimated_arrival_time)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("loads_load_number_key") =>
            {
                AppError::conflict(format!("Load number '{load_number}' was just taken"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create load", e),
        })?;

        let mut lines = Vec::with_capacity(data.lines.len());
        for line in &data.lines {
            let row = sqlx::query_as::<_, LoadPackagingLine>(
                "INSERT INTO load_packaging_lines \
                 (load_id, packaging_type_id, quantity_dispatched, product_reference, notes) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(load.id)
            .bind(line.packaging_type_id)
            .bind(line.quantity_dispatched)
            .bind(&line.product_reference)
            .bind(&line.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create load line", e)
            })?;
            lines.push(row);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit load creation", e)
        })?;

        Ok(LoadWithLines { load, lines })
    }

    /// Patch pre-dispatch fields. The status guard is part of the UPDATE;
    /// zero rows means the load has left the editable states.
    pub async fn update_fields(&self, id: Uuid, patch: &UpdateLoad) -> AppResult<Load> {
        sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 channel_id = COALESCE($2, channel_id), \
                 vehicle_id = COALESCE($3, vehicle_id), \
                 driver_id = COALESCE($4, driver_id), \
                 dispatch_date = COALESCE($5, dispatch_date), \
                 scheduled_departure_time = COALESCE($6, scheduled_departure_time), \
                 expected_farm_arrival_time = COALESCE($7, expected_farm_arrival_time), \
                 expected_farm_departure_time = COALESCE($8, expected_farm_departure_time), \
                 expected_arrival_window_start = COALESCE($9, expected_arrival_window_start), \
                 expected_arrival_window_end = COALESCE($10, expected_arrival_window_end), \
                 estimated_arrival_time = COALESCE($11, estimated_arrival_time), \
                 status = COALESCE($12, status), \
                 backload_id = COALESCE($13, backload_id), \
                 updated_at = NOW() \
             WHERE id = $1 AND status IN ('scheduled', 'loading') RETURNING *",
        )
        .bind(id)
        .bind(patch.channel_id)
        .bind(patch.vehicle_id)
        .bind(patch.driver_id)
        .bind(patch.dispatch_date)
        .bind(patch.scheduled_departure_time)
        .bind(patch.expected_farm_arrival_time)
        .bind(patch.expected_farm_departure_time)
        .bind(patch.expected_arrival_window_start)
        .bind(patch.expected_arrival_window_end)
        .bind(patch.estimated_arrival_time)
        .bind(patch.status)
        .bind(patch.backload_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update load", e))?
        .ok_or_else(|| AppError::invalid_state("Load can only be edited before dispatch"))
    }

    /// Record the confirmed farm arrival. Guarded against repeat
    /// confirmation and post-dispatch states.
    pub async fn set_farm_arrival(
        &self,
        id: Uuid,
        actual: DateTime<Utc>,
        overtime_minutes: i32,
        confirmed_by: Uuid,
    ) -> AppResult<Load> {
        sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 actual_farm_arrival_time = $2, \
                 farm_arrival_overtime_minutes = $3, \
                 has_overtime = has_overtime OR $4, \
                 farm_arrival_confirmed_by = $5, \
                 updated_at = NOW() \
             WHERE id = $1 AND status IN ('scheduled', 'loading') \
               AND actual_farm_arrival_time IS NULL RETURNING *",
        )
        .bind(id)
        .bind(actual)
        .bind(overtime_minutes)
        .bind(overtime_minutes > 0)
        .bind(confirmed_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to confirm farm arrival", e)
        })?
        .ok_or_else(|| {
            AppError::invalid_state("Farm arrival already recorded or load not pre-dispatch")
        })
    }

    /// Record the confirmed farm departure. Requires a recorded arrival
    /// and no prior departure.
    pub async fn set_farm_departure(
        &self,
        id: Uuid,
        actual: DateTime<Utc>,
        overtime_minutes: i32,
        confirmed_by: Uuid,
    ) -> AppResult<Load> {
        sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 actual_farm_departure_time = $2, \
                 farm_departure_overtime_minutes = $3, \
                 has_overtime = has_overtime OR $4, \
                 farm_departure_confirmed_by = $5, \
                 updated_at = NOW() \
             WHERE id = $1 AND status IN ('scheduled', 'loading') \
               AND actual_farm_arrival_time IS NOT NULL \
               AND actual_farm_departure_time IS NULL RETURNING *",
        )
        .bind(id)
        .bind(actual)
        .bind(overtime_minutes)
        .bind(overtime_minutes > 0)
        .bind(confirmed_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to confirm farm departure", e)
        })?
        .ok_or_else(|| {
            AppError::invalid_state(
                "Farm departure requires a recorded arrival and no prior departure",
            )
        })
    }

    /// Dispatch a load: transition to `departed` and move every line's
    /// dispatched quantity out of the origin site, atomically.
    pub async fn dispatch(
        &self,
        id: Uuid,
        actual_departure: DateTime<Utc>,
        dispatched_by: Uuid,
    ) -> AppResult<LoadWithLines> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        require_exists(&mut tx, id).await?;

        let load = sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 status = 'departed', \
                 actual_departure_time = $2, \
                 dispatched_by = $3, \
                 dispatched_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $1 AND status IN ('scheduled', 'loading') RETURNING *",
        )
        .bind(id)
        .bind(actual_departure)
        .bind(dispatched_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dispatch load", e))?
        .ok_or_else(|| AppError::invalid_state("Load has already departed or is terminal"))?;

        let lines = fetch_lines_on(&mut tx, id).await?;

        for line in &lines {
            apply_movement_on(
                &mut tx,
                &NewMovement {
                    movement_type: MovementType::Dispatch,
                    direction: MovementDirection::Out,
                    site_id: load.origin_site_id,
                    packaging_type_id: line.packaging_type_id,
                    quantity: line.quantity_dispatched,
                    quantity_damaged_delta: 0,
                    load_id: Some(load.id),
                    recorded_by: dispatched_by,
                    notes: None,
                },
            )
            .await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit dispatch", e)
        })?;

        Ok(LoadWithLines { load, lines })
    }

    /// Receive a load: write the resolved receipt counts, transition to
    /// `completed`, move received quantities into the destination site,
    /// and raise a missing-packaging alert per short line — atomically.
    #[allow(clippy::too_many_arguments)]
    pub async fn receive(
        &self,
        id: Uuid,
        actual_arrival: DateTime<Utc>,
        plan: &ReceiptPlan,
        on_time_status: Option<OnTimeStatus>,
        discrepancy_notes: Option<&str>,
        received_by: Uuid,
    ) -> AppResult<LoadWithLines> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        require_exists(&mut tx, id).await?;

        let load = sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 status = 'completed', \
                 actual_arrival_time = $2, \
                 on_time_status = $3, \
                 has_discrepancy = $4, \
                 discrepancy_notes = $5, \
                 received_by = $6, \
                 received_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $1 AND status IN ('departed', 'in_transit', 'arrived_depot') RETURNING *",
        )
        .bind(id)
        .bind(actual_arrival)
        .bind(on_time_status)
        .bind(plan.has_discrepancy)
        .bind(discrepancy_notes)
        .bind(received_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to receive load", e))?
        .ok_or_else(|| AppError::invalid_state("Load is not in a receivable state"))?;

        for line in &plan.lines {
            sqlx::query(
                "UPDATE load_packaging_lines SET \
                     quantity_received = $2, \
                     quantity_damaged = $3, \
                     quantity_missing = $4, \
                     notes = COALESCE($5, notes) \
                 WHERE id = $1",
            )
            .bind(line.line_id)
            .bind(line.quantity_received)
            .bind(line.quantity_damaged)
            .bind(line.quantity_missing)
            .bind(&line.notes)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to write receipt counts", e)
            })?;

            apply_movement_on(
                &mut tx,
                &NewMovement {
                    movement_type: MovementType::Receipt,
                    direction: MovementDirection::In,
                    site_id: load.destination_site_id,
                    packaging_type_id: line.packaging_type_id,
                    quantity: line.quantity_received,
                    quantity_damaged_delta: line.quantity_damaged,
                    load_id: Some(load.id),
                    recorded_by: received_by,
                    notes: None,
                },
            )
            .await?;

            if line.quantity_missing > 0 {
                insert_alert_on(
                    &mut tx,
                    &NewAlert {
                        alert_type: AlertType::MissingPackaging,
                        severity: AlertSeverity::Warning,
                        site_id: Some(load.destination_site_id),
                        load_id: Some(load.id),
                        packaging_type_id: Some(line.packaging_type_id),
                        message: &format!(
                            "{} unit(s) missing on load {}",
                            line.quantity_missing, load.load_number
                        ),
                    },
                )
                .await?;
            }
        }

        let lines = fetch_lines_on(&mut tx, id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit receipt", e)
        })?;

        Ok(LoadWithLines { load, lines })
    }

    /// Cancel a load from any non-terminal state.
    pub async fn cancel(&self, id: Uuid, cancelled_by: Uuid) -> AppResult<Load> {
        sqlx::query_as::<_, Load>(
            "UPDATE loads SET \
                 status = 'cancelled', \
                 cancelled_by = $2, \
                 cancelled_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ('completed', 'cancelled') RETURNING *",
        )
        .bind(id)
        .bind(cancelled_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel load", e))?
        .ok_or_else(|| AppError::invalid_state("Load is already terminal"))
    }

    /// Hard-delete a load that is still `scheduled` (no inventory has
    /// moved). Returns false when nothing was deleted.
    pub async fn delete_scheduled(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM loads WHERE id = $1 AND status = 'scheduled'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete load", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fail with `NotFound` when no load row exists — distinguishes a missing
/// load from a guard rejection inside the same transaction.
async fn require_exists(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM loads WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check load", e))?;
    if exists {
        Ok(())
    } else {
        Err(AppError::not_found(format!("Load {id} not found")))
    }
}

/// Fetch a load's lines inside the caller's transaction.
async fn fetch_lines_on(
    conn: &mut PgConnection,
    load_id: Uuid,
) -> AppResult<Vec<LoadPackagingLine>> {
    sqlx::query_as::<_, LoadPackagingLine>(
        "SELECT * FROM load_packaging_lines WHERE load_id = $1 ORDER BY created_at, id",
    )
    .bind(load_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load lines", e))
}
