//! Search configuration for the path planner.

use serde::{Deserialize, Serialize};

use super::search::SearchError;

/// Upper bound for headway and departure window (minutes).
pub const MAX_SPAN_MINS: f64 = 24.0 * 60.0;

/// Slowest allowed fraction of the permitted speed.
pub const MIN_SPEED_FACTOR: f64 = 0.01;

pub const MAX_DWELL_SCALE: f64 = 10.0;
pub const MAX_CANDIDATES: usize = 1_000;
pub const MAX_ATTEMPTS: usize = 100_000;
pub const MAX_WORKERS: usize = 64;

/// Configuration parameters for path search.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum separation between same-direction trains in a section (minutes).
    pub min_headway_mins: f64,

    /// Maximum number of feasible candidates to collect.
    pub max_candidates: usize,

    /// Maximum number of candidates to generate before giving up.
    pub max_attempts: usize,

    /// Width of the window after the requested start in which departures
    /// are drawn (minutes).
    pub departure_window_mins: f64,

    /// Lower bound of the corridor-wide speed factor.
    pub speed_factor_min: f64,

    /// Upper bound of the corridor-wide speed factor.
    pub speed_factor_max: f64,

    /// Multiplier applied to the train's maximum dwell when sampling stops.
    pub dwell_scale: f64,

    /// Number of parallel generation workers for seeded searches.
    pub workers: usize,
}

impl SearchConfig {
    /// Set the minimum headway.
    pub fn with_min_headway(mut self, mins: f64) -> Self {
        self.min_headway_mins = mins;
        self
    }

    /// Set the candidate and attempt budgets.
    pub fn with_budget(mut self, max_candidates: usize, max_attempts: usize) -> Self {
        self.max_candidates = max_candidates;
        self.max_attempts = max_attempts;
        self
    }

    /// Set the number of parallel workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check that the parameters describe a usable search.
    ///
    /// Every field is bounded, so a configuration taken straight from a
    /// request can't ask for unbounded work or unrepresentable times.
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |msg: String| Err(SearchError::InvalidRequest(msg));

        if !(0.0..=MAX_SPAN_MINS).contains(&self.min_headway_mins) {
            return invalid(format!("min headway must be within 0..={MAX_SPAN_MINS} minutes"));
        }
        if !(0.0..=MAX_SPAN_MINS).contains(&self.departure_window_mins) {
            return invalid(format!(
                "departure window must be within 0..={MAX_SPAN_MINS} minutes"
            ));
        }
        if !(MIN_SPEED_FACTOR..=1.0).contains(&self.speed_factor_min) {
            return invalid(format!("speed factor must be within {MIN_SPEED_FACTOR}..=1"));
        }
        if !(self.speed_factor_min..=1.0).contains(&self.speed_factor_max) {
            return invalid("speed factor range is inverted or above 1".to_string());
        }
        if !(0.0..=MAX_DWELL_SCALE).contains(&self.dwell_scale) {
            return invalid(format!("dwell scale must be within 0..={MAX_DWELL_SCALE}"));
        }
        if self.max_candidates > MAX_CANDIDATES {
            return invalid(format!("at most {MAX_CANDIDATES} candidates may be requested"));
        }
        if self.max_attempts > MAX_ATTEMPTS {
            return invalid(format!("at most {MAX_ATTEMPTS} attempts may be requested"));
        }
        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return invalid(format!("workers must be within 1..={MAX_WORKERS}"));
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_headway_mins: 5.0,
            max_candidates: 5,
            max_attempts: 100,
            departure_window_mins: 5.0,
            speed_factor_min: 0.6,
            speed_factor_max: 1.0,
            dwell_scale: 1.0,
            workers: 1,
        }
    }
}
