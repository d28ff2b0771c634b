//! Inventory ledger repository implementation.
//!
//! Every on-hand mutation goes through [`apply_movement_on`]: one immutable
//! `packaging_movements` row plus an upsert-with-add on `site_inventory`,
//! always inside the caller's transaction.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use packflow_core::error::{AppError, ErrorKind};
use packflow_core::result::AppResult;
use packflow_entity::inventory::{
    MovementDirection, MovementType, PackagingMovement, SiteInventory,
};

/// Data for one ledger entry.
#[derive(Debug, Clone)]
pub struct NewMovement<'a> {
    /// The business reason for the entry.
    pub movement_type: MovementType,
    /// Direction relative to the site.
    pub direction: MovementDirection,
    /// The site whose stock changes.
    pub site_id: Uuid,
    /// The packaging type moved.
    pub packaging_type_id: Uuid,
    /// Units moved; always non-negative, direction carries the sign.
    pub quantity: i32,
    /// Signed delta applied to the site's damaged-unit count.
    pub quantity_damaged_delta: i32,
    /// The load that caused the entry, if load-driven.
    pub load_id: Option<Uuid>,
    /// The actor recording the entry.
    pub recorded_by: Uuid,
    /// Free-form notes.
    pub notes: Option<&'a str>,
}

/// Append a movement row and apply its deltas to `site_inventory`.
///
/// The inventory write is a relative adjustment (`quantity = quantity +
/// delta`) guarded by the unique (site, packaging type) constraint, so
/// concurrent movements against the same pair serialize under row-level
/// locking instead of losing updates. A missing row is created with the
/// deltas as its initial value. No floor is enforced — negative on-hand
/// is tolerated until reconciled by a manual adjustment.
pub(crate) async fn apply_movement_on(
    conn: &mut PgConnection,
    movement: &NewMovement<'_>,
) -> AppResult<PackagingMovement> {
    let row = sqlx::query_as::<_, PackagingMovement>(
        "INSERT INTO packaging_movements \
         (movement_type, direction, site_id, packaging_type_id, quantity, quantity_damaged, load_id, recorded_by, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(movement.movement_type)
    .bind(movement.direction)
    .bind(movement.site_id)
    .bind(movement.packaging_type_id)
    .bind(movement.quantity)
    .bind(movement.quantity_damaged_delta)
    .bind(movement.load_id)
    .bind(movement.recorded_by)
    .bind(movement.notes)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record movement", e))?;

    let delta = movement.direction.signed(movement.quantity);
    sqlx::query(
        "INSERT INTO site_inventory (site_id, packaging_type_id, quantity, quantity_damaged) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (site_id, packaging_type_id) DO UPDATE SET \
             quantity = site_inventory.quantity + EXCLUDED.quantity, \
             quantity_damaged = site_inventory.quantity_damaged + EXCLUDED.quantity_damaged, \
             updated_at = NOW()",
    )
    .bind(movement.site_id)
    .bind(movement.packaging_type_id)
    .bind(delta)
    .bind(movement.quantity_damaged_delta)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to adjust inventory", e))?;

    Ok(row)
}

/// Repository for the inventory ledger and on-hand reads.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one movement and apply it to on-hand stock, atomically.
    pub async fn apply_movement(
        &self,
        movement: &NewMovement<'_>,
    ) -> AppResult<PackagingMovement> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let row = apply_movement_on(&mut tx, movement).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit movement", e)
        })?;

        Ok(row)
    }

    /// Current on-hand row for one (site, packaging type) pair.
    pub async fn find_on_hand(
        &self,
        site_id: Uuid,
        packaging_type_id: Uuid,
    ) -> AppResult<Option<SiteInventory>> {
        sqlx::query_as::<_, SiteInventory>(
            "SELECT * FROM site_inventory WHERE site_id = $1 AND packaging_type_id = $2",
        )
        .bind(site_id)
        .bind(packaging_type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read on-hand stock", e))
    }

    /// All on-hand rows for a site.
    pub async fn find_by_site(&self, site_id: Uuid) -> AppResult<Vec<SiteInventory>> {
        sqlx::query_as::<_, SiteInventory>(
            "SELECT * FROM site_inventory WHERE site_id = $1 ORDER BY packaging_type_id",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list site stock", e))
    }

    /// Movement history for a site, newest first.
    pub async fn find_movements_by_site(
        &self,
        site_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<PackagingMovement>> {
        sqlx::query_as::<_, PackagingMovement>(
            "SELECT * FROM packaging_movements WHERE site_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(site_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list movements", e))
    }

    /// All movements written for one load, oldest first.
    pub async fn find_movements_by_load(
        &self,
        load_id: Uuid,
    ) -> AppResult<Vec<PackagingMovement>> {
        sqlx::query_as::<_, PackagingMovement>(
            "SELECT * FROM packaging_movements WHERE load_id = $1 ORDER BY created_at ASC",
        )
        .bind(load_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list load movements", e)
        })
    }
}
