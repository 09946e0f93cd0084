//! Train service description.

use serde::{Deserialize, Serialize};

use super::{Direction, DomainError};

/// Kind of traffic a train carries.
///
/// Passed through to scoring; the search itself treats both alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainCategory {
    Passenger,
    Freight,
}

/// A train service to be pathed through the corridor.
///
/// Speeds are in km/h, length in metres, dwell times in minutes.
/// Acceleration and deceleration (m/s²) are carried for scoring only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainService {
    pub id: String,
    pub category: TrainCategory,
    pub direction: Direction,
    pub max_speed_kmh: f64,
    pub length_m: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub priority: u32,
    #[serde(default)]
    pub min_dwell_mins: f64,
    #[serde(default = "default_max_dwell")]
    pub max_dwell_mins: f64,
}

/// Longest dwell a service may ask for (minutes).
const MAX_DWELL_MINS: f64 = 24.0 * 60.0;

fn default_max_dwell() -> f64 {
    5.0
}

impl TrainService {
    /// A typical fast passenger service.
    pub fn passenger(direction: Direction) -> Self {
        Self {
            id: format!("P{}101", direction.as_str().to_uppercase()),
            category: TrainCategory::Passenger,
            direction,
            max_speed_kmh: 160.0,
            length_m: 200.0,
            acceleration: 0.8,
            deceleration: 0.6,
            priority: 1,
            min_dwell_mins: 1.0,
            max_dwell_mins: 3.0,
        }
    }

    /// A typical heavy freight service.
    pub fn freight(direction: Direction) -> Self {
        Self {
            id: format!("F{}201", direction.as_str().to_uppercase()),
            category: TrainCategory::Freight,
            direction,
            max_speed_kmh: 100.0,
            length_m: 500.0,
            acceleration: 0.3,
            deceleration: 0.2,
            priority: 2,
            min_dwell_mins: 2.0,
            max_dwell_mins: 5.0,
        }
    }

    /// Check that the service can actually be pathed.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason| DomainError::InvalidTrain {
            train: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if !(self.max_speed_kmh.is_finite() && self.max_speed_kmh > 0.0) {
            return Err(invalid("max speed must be positive"));
        }
        if !(self.min_dwell_mins.is_finite() && self.min_dwell_mins >= 0.0) {
            return Err(invalid("min dwell must be non-negative"));
        }
        if !self.max_dwell_mins.is_finite() || self.max_dwell_mins < self.min_dwell_mins {
            return Err(invalid("max dwell must not be below min dwell"));
        }
        if self.max_dwell_mins > MAX_DWELL_MINS {
            return Err(invalid("max dwell must not exceed a day"));
        }

        Ok(())
    }
}
