//! Load entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::line::{CreateLoadLine, LoadPackagingLine};
use super::status::LoadStatus;
use super::timing::OnTimeStatus;

/// One scheduled or executed transport of packaging between two sites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Load {
    /// Unique load identifier.
    pub id: Uuid,
    /// Human-readable load number, `{siteCode}{YY}{MM}{DD}[-N]`.
    pub load_number: String,
    /// Origin site.
    pub origin_site_id: Uuid,
    /// Destination site (never equal to the origin).
    pub destination_site_id: Uuid,
    /// Sales/logistics channel, if assigned.
    pub channel_id: Option<Uuid>,
    /// Assigned vehicle, if any.
    pub vehicle_id: Option<Uuid>,
    /// Assigned driver, if any.
    pub driver_id: Option<Uuid>,
    /// The date the load is planned to run.
    pub dispatch_date: NaiveDate,
    /// Scheduled departure from the origin.
    pub scheduled_departure_time: Option<DateTime<Utc>>,
    /// Actual departure stamped at dispatch.
    pub actual_departure_time: Option<DateTime<Utc>>,
    /// Per-load override of the expected farm arrival time of day.
    pub expected_farm_arrival_time: Option<NaiveTime>,
    /// Confirmed actual farm arrival.
    pub actual_farm_arrival_time: Option<DateTime<Utc>>,
    /// Minutes late against the expected farm arrival (0 = on time).
    pub farm_arrival_overtime_minutes: Option<i32>,
    /// Per-load override of the expected farm departure time of day.
    pub expected_farm_departure_time: Option<NaiveTime>,
    /// Confirmed actual farm departure.
    pub actual_farm_departure_time: Option<DateTime<Utc>>,
    /// Minutes late against the expected farm departure (0 = on time).
    pub farm_departure_overtime_minutes: Option<i32>,
    /// Start of the expected depot arrival window.
    pub expected_arrival_window_start: Option<DateTime<Utc>>,
    /// End of the expected depot arrival window.
    pub expected_arrival_window_end: Option<DateTime<Utc>>,
    /// Telematics-estimated arrival, if the provider supplied one.
    pub estimated_arrival_time: Option<DateTime<Utc>>,
    /// Actual depot arrival stamped at receipt.
    pub actual_arrival_time: Option<DateTime<Utc>>,
    /// On-time classification computed at receipt.
    pub on_time_status: Option<OnTimeStatus>,
    /// Current lifecycle status.
    pub status: LoadStatus,
    /// True iff any line has received != dispatched or damaged/missing > 0.
    pub has_discrepancy: bool,
    /// True iff any expected-vs-actual comparison exceeded its tolerance.
    pub has_overtime: bool,
    /// Free-form notes recorded with a discrepancy.
    pub discrepancy_notes: Option<String>,
    /// Linked return-trip load, if one exists.
    pub backload_id: Option<Uuid>,
    /// Actor who created the load.
    pub created_by: Uuid,
    /// Actor who confirmed the farm arrival.
    pub farm_arrival_confirmed_by: Option<Uuid>,
    /// Actor who confirmed the farm departure.
    pub farm_departure_confirmed_by: Option<Uuid>,
    /// Actor who confirmed the dispatch.
    pub dispatched_by: Option<Uuid>,
    /// When the dispatch was confirmed.
    pub dispatched_at: Option<DateTime<Utc>>,
    /// Actor who confirmed the receipt.
    pub received_by: Option<Uuid>,
    /// When the receipt was confirmed.
    pub received_at: Option<DateTime<Utc>>,
    /// Actor who cancelled the load.
    pub cancelled_by: Option<Uuid>,
    /// When the load was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the load record was created.
    pub created_at: DateTime<Utc>,
    /// When the load record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A load together with its packaging lines.
///
/// Repositories return this aggregate so callers never re-join lines
/// themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadWithLines {
    /// The load record.
    pub load: Load,
    /// The per-packaging-type lines, ordered by creation.
    pub lines: Vec<LoadPackagingLine>,
}

/// Data required to create a new load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoad {
    /// Origin site.
    pub origin_site_id: Uuid,
    /// Destination site.
    pub destination_site_id: Uuid,
    /// Sales/logistics channel.
    pub channel_id: Option<Uuid>,
    /// Assigned vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Assigned driver.
    pub driver_id: Option<Uuid>,
    /// The date the load is planned to run.
    pub dispatch_date: NaiveDate,
    /// Scheduled departure from the origin.
    pub scheduled_departure_time: Option<DateTime<Utc>>,
    /// Per-load override of the expected farm arrival time of day.
    pub expected_farm_arrival_time: Option<NaiveTime>,
    /// Per-load override of the expected farm departure time of day.
    pub expected_farm_departure_time: Option<NaiveTime>,
    /// Start of the expected depot arrival window.
    pub expected_arrival_window_start: Option<DateTime<Utc>>,
    /// End of the expected depot arrival window.
    pub expected_arrival_window_end: Option<DateTime<Utc>>,
    /// Telematics-estimated arrival.
    pub estimated_arrival_time: Option<DateTime<Utc>>,
    /// Packaging lines; at least one with a positive quantity is required.
    pub lines: Vec<CreateLoadLine>,
}

/// Free-form field patch applied while the load is still pre-dispatch.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLoad {
    /// New channel assignment.
    pub channel_id: Option<Uuid>,
    /// New vehicle assignment.
    pub vehicle_id: Option<Uuid>,
    /// New driver assignment.
    pub driver_id: Option<Uuid>,
    /// New planned dispatch date.
    pub dispatch_date: Option<NaiveDate>,
    /// New scheduled departure.
    pub scheduled_departure_time: Option<DateTime<Utc>>,
    /// New expected farm arrival override.
    pub expected_farm_arrival_time: Option<NaiveTime>,
    /// New expected farm departure override.
    pub expected_farm_departure_time: Option<NaiveTime>,
    /// New expected arrival window start.
    pub expected_arrival_window_start: Option<DateTime<Utc>>,
    /// New expected arrival window end.
    pub expected_arrival_window_end: Option<DateTime<Utc>>,
    /// New estimated arrival.
    pub estimated_arrival_time: Option<DateTime<Utc>>,
    /// Mark the load as loading (or back to scheduled).
    pub status: Option<super::status::LoadStatus>,
    /// Linked return-trip load.
    pub backload_id: Option<Uuid>,
}
