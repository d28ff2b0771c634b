//! Load lifecycle controller.
//!
//! Orchestrates every load state transition: validation happens here,
//! the atomic mutation (load + lines + movements + inventory + alerts)
//! happens in a single repository transaction.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use packflow_core::{AppError, AppResult};
use packflow_database::repositories::load::LoadRepository;
use packflow_database::repositories::packaging_type::PackagingTypeRepository;
use packflow_database::repositories::site::SiteRepository;
use packflow_entity::load::{
    CreateLoad, CreateLoadLine, Load, LoadStatus, LoadWithLines, ReceiptLineInput, ReceiptPlan,
    UpdateLoad, load_number_prefix,
};

use crate::context::RequestContext;
use crate::timing::TimingEvaluator;

/// Handles load lifecycle transitions and their inventory effects.
#[derive(Debug, Clone)]
pub struct LoadService {
    /// Load repository.
    load_repo: Arc<LoadRepository>,
    /// Site directory (for load-number prefixes and validation).
    site_repo: Arc<SiteRepository>,
    /// Packaging type catalog (existence checks only).
    packaging_repo: Arc<PackagingTypeRepository>,
    /// Timing evaluator with configured defaults.
    timing: TimingEvaluator,
}

impl LoadService {
    /// Creates a new load service.
    pub fn new(
        load_repo: Arc<LoadRepository>,
        site_repo: Arc<SiteRepository>,
        packaging_repo: Arc<PackagingTypeRepository>,
        timing: TimingEvaluator,
    ) -> Self {
        Self {
            load_repo,
            site_repo,
            packaging_repo,
            timing,
        }
    }

    /// Gets a load with its packaging lines.
    pub async fn get_load(&self, id: Uuid) -> AppResult<LoadWithLines> {
        self.load_repo
            .find_with_lines(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Load {id} not found")))
    }

    /// Creates a new load in `scheduled` with a generated load number.
    pub async fn create_load(
        &self,
        ctx: &RequestContext,
        data: CreateLoad,
    ) -> AppResult<LoadWithLines> {
        if data.destination_site_id == data.origin_site_id {
            return Err(AppError::validation(
                "Destination site must differ from origin site",
            ));
        }
        if data.lines.is_empty() {
            return Err(AppError::validation(
                "A load requires at least one packaging line",
            ));
        }
        for line in &data.lines {
            if line.quantity_dispatched <= 0 {
                return Err(AppError::validation(
                    "Packaging line quantity must be greater than zero",
                ));
            }
            if !self
                .packaging_repo
                .exists_active(line.packaging_type_id)
                .await?
            {
                return Err(AppError::validation(format!(
                    "Unknown packaging type {}",
                    line.packaging_type_id
                )));
            }
        }

        let origin = self
            .site_repo
            .find_by_id(data.origin_site_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Unknown origin site {}", data.origin_site_id))
            })?;
        if !self.site_repo.exists_active(data.destination_site_id).await? {
            return Err(AppError::validation(format!(
                "Unknown destination site {}",
                data.destination_site_id
            )));
        }

        let prefix = load_number_prefix(&origin.code, data.dispatch_date);
        let created = self
            .load_repo
            .create(&data, &prefix, ctx.actor_id)
            .await?;

        info!(
            actor_id = %ctx.actor_id,
            load_id = %created.load.id,
            load_number = %created.load.load_number,
            lines = created.lines.len(),
            "Load created"
        );

        Ok(created)
    }

    /// Patches pre-dispatch fields on a load.
    pub async fn update_load(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: UpdateLoad,
    ) -> AppResult<Load> {
        let load = self.require_load(id).await?;
        if !load.status.is_pre_dispatch() {
            return Err(AppError::invalid_state(format!(
                "Load {} cannot be edited in status {}",
                load.load_number, load.status
            )));
        }
        if let Some(status) = patch.status {
            if !status.is_pre_dispatch() {
                return Err(AppError::validation(
                    "Only scheduled/loading may be set directly; use the lifecycle operations",
                ));
            }
        }

        let updated = self.load_repo.update_fields(id, &patch).await?;
        info!(actor_id = %ctx.actor_id, load_id = %id, "Load updated");
        Ok(updated)
    }

    /// Confirms the actual farm arrival and records overtime against the
    /// expected time (per-load override or configured default).
    pub async fn confirm_farm_arrival(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        actual: DateTime<Utc>,
    ) -> AppResult<Load> {
        let load = self.require_load(id).await?;
        if !load.status.is_pre_dispatch() || load.actual_farm_arrival_time.is_some() {
            return Err(AppError::invalid_state(format!(
                "Farm arrival for load {} is already recorded or the load has departed",
                load.load_number
            )));
        }

        let overtime = self.timing.farm_arrival_overtime(
            load.expected_farm_arrival_time,
            actual,
            load.dispatch_date,
        );
        let updated = self
            .load_repo
            .set_farm_arrival(id, actual, overtime as i32, ctx.actor_id)
            .await?;

        info!(
            actor_id = %ctx.actor_id,
            load_id = %id,
            overtime_minutes = overtime,
            "Farm arrival confirmed"
        );
        Ok(updated)
    }

    /// Confirms the actual farm departure; requires a recorded arrival.
    pub async fn confirm_farm_departure(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        actual: DateTime<Utc>,
    ) -> AppResult<Load> {
        let load = self.require_load(id).await?;
        if !load.status.is_pre_dispatch()
            || load.actual_farm_arrival_time.is_none()
            || load.actual_farm_departure_time.is_some()
        {
            return Err(AppError::invalid_state(format!(
                "Farm departure for load {} requires a recorded arrival and no prior departure",
                load.load_number
            )));
        }

        let overtime = self.timing.farm_departure_overtime(
            load.expected_farm_departure_time,
            actual,
            load.dispatch_date,
        );
        let updated = self
            .load_repo
            .set_farm_departure(id, actual, overtime as i32, ctx.actor_id)
            .await?;

        info!(
            actor_id = %ctx.actor_id,
            load_id = %id,
            overtime_minutes = overtime,
            "Farm departure confirmed"
        );
        Ok(updated)
    }

    /// Dispatches a load: transitions to `departed` and moves every
    /// line's quantity out of the origin site, atomically. The status
    /// guard runs inside the transaction, so a concurrent second call
    /// fails with `InvalidState` and decrements nothing.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        actual_departure: DateTime<Utc>,
    ) -> AppResult<LoadWithLines> {
        let dispatched = self
            .load_repo
            .dispatch(id, actual_departure, ctx.actor_id)
            .await?;

        info!(
            actor_id = %ctx.actor_id,
            load_id = %id,
            load_number = %dispatched.load.load_number,
            lines = dispatched.lines.len(),
            "Load dispatched"
        );
        Ok(dispatched)
    }

    /// Receives a load: resolves the supplied counts into a receipt plan,
    /// classifies on-time status against the expected arrival window,
    /// transitions to `completed`, moves received quantities into the
    /// destination, and raises a missing-packaging alert per short line.
    pub async fn receive(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        actual_arrival: DateTime<Utc>,
        lines: Vec<ReceiptLineInput>,
        discrepancy_notes: Option<String>,
    ) -> AppResult<LoadWithLines> {
        let current = self.get_load(id).await?;
        if !current.load.status.can_receive() {
            return Err(AppError::invalid_state(format!(
                "Load {} cannot be received in status {}",
                current.load.load_number, current.load.status
            )));
        }

        let plan = ReceiptPlan::build(&current.lines, &lines)?;

        let on_time_status = match (
            current.load.expected_arrival_window_start,
            current.load.expected_arrival_window_end,
        ) {
            (Some(start), Some(end)) => {
                Some(self.timing.on_time_status(start, end, actual_arrival))
            }
            _ => None,
        };

        let received = self
            .load_repo
            .receive(
                id,
                actual_arrival,
                &plan,
                on_time_status,
                discrepancy_notes.as_deref(),
                ctx.actor_id,
            )
            .await?;

        if plan.has_discrepancy {
            warn!(
                actor_id = %ctx.actor_id,
                load_id = %id,
                load_number = %received.load.load_number,
                "Load received with discrepancy"
            );
        } else {
            info!(
                actor_id = %ctx.actor_id,
                load_id = %id,
                load_number = %received.load.load_number,
                "Load received"
            );
        }
        Ok(received)
    }

    /// Duplicates a load into a new `scheduled` load on a new date,
    /// copying routing and line quantities only. The original load and
    /// inventory are untouched.
    pub async fn duplicate(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        new_dispatch_date: NaiveDate,
    ) -> AppResult<LoadWithLines> {
        let original = self.get_load(id).await?;

        let data = CreateLoad {
            origin_site_id: original.load.origin_site_id,
            destination_site_id: original.load.destination_site_id,
            channel_id: original.load.channel_id,
            vehicle_id: original.load.vehicle_id,
            driver_id: original.load.driver_id,
            dispatch_date: new_dispatch_date,
            scheduled_departure_time: None,
            expected_farm_arrival_time: original.load.expected_farm_arrival_time,
            expected_farm_departure_time: original.load.expected_farm_departure_time,
            expected_arrival_window_start: None,
            expected_arrival_window_end: None,
            estimated_arrival_time: None,
            lines: original
                .lines
                .iter()
                .map(|line| CreateLoadLine {
                    packaging_type_id: line.packaging_type_id,
                    quantity_dispatched: line.quantity_dispatched,
                    product_reference: line.product_reference.clone(),
                    notes: None,
                })
                .collect(),
        };

        let origin = self
            .site_repo
            .find_by_id(data.origin_site_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Unknown origin site {}", data.origin_site_id))
            })?;
        let prefix = load_number_prefix(&origin.code, new_dispatch_date);
        let copy = self.load_repo.create(&data, &prefix, ctx.actor_id).await?;

        info!(
            actor_id = %ctx.actor_id,
            source_id = %id,
            new_id = %copy.load.id,
            new_number = %copy.load.load_number,
            "Load duplicated"
        );
        Ok(copy)
    }

    /// Cancels a load from any non-terminal state.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Load> {
        let load = self.require_load(id).await?;
        if !load.status.can_cancel() {
            return Err(AppError::invalid_state(format!(
                "Load {} is already {}",
                load.load_number, load.status
            )));
        }

        let cancelled = self.load_repo.cancel(id, ctx.actor_id).await?;
        info!(actor_id = %ctx.actor_id, load_id = %id, "Load cancelled");
        Ok(cancelled)
    }

    /// Hard-deletes a load that is still `scheduled`.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let load = self.require_load(id).await?;
        if !matches!(load.status, LoadStatus::Scheduled) {
            return Err(AppError::invalid_state(format!(
                "Load {} can only be deleted while scheduled",
                load.load_number
            )));
        }

        if !self.load_repo.delete_scheduled(id).await? {
            return Err(AppError::invalid_state(
                "Load left the scheduled state before it could be deleted",
            ));
        }

        info!(actor_id = %ctx.actor_id, load_id = %id, "Load deleted");
        Ok(())
    }

    /// Internal helper — loads the bare load row or fails with NotFound.
    async fn require_load(&self, id: Uuid) -> AppResult<Load> {
        self.load_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Load {id} not found")))
    }
}
