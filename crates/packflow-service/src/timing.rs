//! Expected-vs-actual timing evaluation.
//!
//! Pure functions over an injected [`TimingConfig`]; results are persisted
//! on the load at confirmation time so historical loads keep the
//! classification that applied when they were confirmed, even if the
//! configured defaults change later.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use packflow_core::AppResult;
use packflow_core::config::timing::TimingConfig;
use packflow_entity::load::OnTimeStatus;

/// Evaluates overtime minutes and on-time classifications.
#[derive(Debug, Clone)]
pub struct TimingEvaluator {
    farm_arrival_default: NaiveTime,
    farm_departure_default: NaiveTime,
    tolerance: Duration,
}

impl TimingEvaluator {
    /// Build an evaluator from configuration, parsing the default times
    /// up front.
    pub fn new(config: &TimingConfig) -> AppResult<Self> {
        Ok(Self {
            farm_arrival_default: config.farm_arrival()?,
            farm_departure_default: config.farm_departure()?,
            tolerance: Duration::minutes(config.on_time_tolerance_minutes),
        })
    }

    /// Minutes by which `actual` exceeds the expected instant built from
    /// `reference_date` + `expected`. Early is not overtime: negative
    /// results clamp to 0.
    pub fn overtime(
        &self,
        expected: NaiveTime,
        actual: DateTime<Utc>,
        reference_date: NaiveDate,
    ) -> i64 {
        let expected_instant = reference_date.and_time(expected).and_utc();
        (actual - expected_instant).num_minutes().max(0)
    }

    /// Farm-arrival overtime, using the per-load override when present.
    pub fn farm_arrival_overtime(
        &self,
        override_time: Option<NaiveTime>,
        actual: DateTime<Utc>,
        reference_date: NaiveDate,
    ) -> i64 {
        let expected = override_time.unwrap_or(self.farm_arrival_default);
        self.overtime(expected, actual, reference_date)
    }

    /// Farm-departure overtime, using the per-load override when present.
    pub fn farm_departure_overtime(
        &self,
        override_time: Option<NaiveTime>,
        actual: DateTime<Utc>,
        reference_date: NaiveDate,
    ) -> i64 {
        let expected = override_time.unwrap_or(self.farm_departure_default);
        self.overtime(expected, actual, reference_date)
    }

    /// Classify an actual arrival against its expected window, with the
    /// configured tolerance band on both edges.
    pub fn on_time_status(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        actual: DateTime<Utc>,
    ) -> OnTimeStatus {
        if actual < window_start - self.tolerance {
            OnTimeStatus::Early
        } else if actual > window_end + self.tolerance {
            OnTimeStatus::Delayed
        } else {
            OnTimeStatus::OnTime
        }
    }
}
