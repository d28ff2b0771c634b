//! Manual ledger entries and inventory reads.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use packflow_core::{AppError, AppResult};
use packflow_database::repositories::inventory::{InventoryRepository, NewMovement};
use packflow_database::repositories::packaging_type::PackagingTypeRepository;
use packflow_database::repositories::site::SiteRepository;
use packflow_entity::inventory::{
    MovementDirection, MovementType, PackagingMovement, SiteInventory,
};

use crate::context::RequestContext;

/// A manual ledger entry request.
///
/// `quantity` is signed: positive adds to on-hand stock, negative removes.
/// Direction is derived from the sign before the entry is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMovement {
    /// The site whose stock changes.
    pub site_id: Uuid,
    /// The packaging type moved.
    pub packaging_type_id: Uuid,
    /// The business reason; must not be a load-driven type.
    pub movement_type: MovementType,
    /// Signed unit delta.
    pub quantity: i32,
    /// Signed delta to the damaged-unit count.
    #[serde(default)]
    pub quantity_damaged_delta: i32,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Records manual ledger entries and serves on-hand reads.
#[derive(Debug, Clone)]
pub struct InventoryService {
    inventory_repo: Arc<InventoryRepository>,
    site_repo: Arc<SiteRepository>,
    packaging_repo: Arc<PackagingTypeRepository>,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(
        inventory_repo: Arc<InventoryRepository>,
        site_repo: Arc<SiteRepository>,
        packaging_repo: Arc<PackagingTypeRepository>,
    ) -> Self {
        Self {
            inventory_repo,
            site_repo,
            packaging_repo,
        }
    }

    /// Records a manual ledger entry.
    ///
    /// Load-driven movement types are rejected; those entries are written
    /// exclusively by the load lifecycle so the ledger stays reconcilable
    /// against load history.
    pub async fn record_manual(
        &self,
        ctx: &RequestContext,
        data: RecordMovement,
    ) -> AppResult<PackagingMovement> {
        if data.movement_type.is_load_driven() {
            return Err(AppError::validation(format!(
                "Movement type {} is written by the load lifecycle and cannot be entered manually",
                data.movement_type
            )));
        }
        if data.quantity == 0 && data.quantity_damaged_delta == 0 {
            return Err(AppError::validation(
                "A movement must change the on-hand or damaged quantity",
            ));
        }
        if !self.site_repo.exists_active(data.site_id).await? {
            return Err(AppError::not_found(format!(
                "Site {} not found",
                data.site_id
            )));
        }
        if !self
            .packaging_repo
            .exists_active(data.packaging_type_id)
            .await?
        {
            return Err(AppError::not_found(format!(
                "Packaging type {} not found",
                data.packaging_type_id
            )));
        }

        let direction = MovementDirection::from_signed_quantity(data.quantity);
        let movement = NewMovement {
            movement_type: data.movement_type,
            direction,
            site_id: data.site_id,
            packaging_type_id: data.packaging_type_id,
            quantity: data.quantity.abs(),
            quantity_damaged_delta: data.quantity_damaged_delta,
            load_id: None,
            recorded_by: ctx.actor_id,
            notes: data.notes.as_deref(),
        };

        let row = self.inventory_repo.apply_movement(&movement).await?;

        info!(
            actor_id = %ctx.actor_id,
            site_id = %data.site_id,
            packaging_type_id = %data.packaging_type_id,
            movement_type = %data.movement_type,
            quantity = data.quantity,
            "Manual movement recorded"
        );
        Ok(row)
    }

    /// Current on-hand row for one (site, packaging type) pair.
    pub async fn on_hand(
        &self,
        site_id: Uuid,
        packaging_type_id: Uuid,
    ) -> AppResult<Option<SiteInventory>> {
        self.inventory_repo
            .find_on_hand(site_id, packaging_type_id)
            .await
    }

    /// All on-hand rows for a site.
    pub async fn site_stock(&self, site_id: Uuid) -> AppResult<Vec<SiteInventory>> {
        if !self.site_repo.exists_active(site_id).await? {
            return Err(AppError::not_found(format!("Site {site_id} not found")));
        }
        self.inventory_repo.find_by_site(site_id).await
    }

    /// Movement history for a site, newest first.
    pub async fn movements(
        &self,
        site_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<PackagingMovement>> {
        self.inventory_repo
            .find_movements_by_site(site_id, limit)
            .await
    }

    /// Movements written for one load, in the order they happened.
    pub async fn load_movements(&self, load_id: Uuid) -> AppResult<Vec<PackagingMovement>> {
        self.inventory_repo.find_movements_by_load(load_id).await
    }
}
