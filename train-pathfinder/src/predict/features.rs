//! Numeric features describing a train path.

use chrono::Timelike;

use crate::domain::{Direction, TrainCategory, TrainPath};

/// Number of values in [`PathFeatures::to_array`].
pub const FEATURE_COUNT: usize = 12;

/// Summary statistics of a path, as fed to a scoring model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFeatures {
    /// Start time as fractional hours since midnight.
    pub start_hour: f64,
    /// Journey time in hours.
    pub duration_hours: f64,
    pub mean_speed: f64,
    /// Population standard deviation of per-section speeds.
    pub speed_std: f64,
    pub mean_dwell: f64,
    pub total_dwell: f64,
    pub max_speed: f64,
    pub length: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub is_passenger: bool,
    pub is_up: bool,
}

impl PathFeatures {
    /// Compute the features of a path.
    pub fn extract(path: &TrainPath) -> Self {
        let start = path.start_time();
        let start_hour = f64::from(start.hour())
            + f64::from(start.minute()) / 60.0
            + f64::from(start.second()) / 3600.0;

        let (mean_speed, speed_std) = mean_and_std(path.speeds());
        let total_dwell = path.total_dwell_mins();
        let mean_dwell = total_dwell / path.schedule().len() as f64;

        let train = path.train();

        Self {
            start_hour,
            duration_hours: path.journey_mins() / 60.0,
            mean_speed,
            speed_std,
            mean_dwell,
            total_dwell,
            max_speed: train.max_speed_kmh,
            length: train.length_m,
            acceleration: train.acceleration,
            deceleration: train.deceleration,
            is_passenger: train.category == TrainCategory::Passenger,
            is_up: train.direction == Direction::Up,
        }
    }

    /// Flatten into model input order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.start_hour,
            self.duration_hours,
            self.mean_speed,
            self.speed_std,
            self.mean_dwell,
            self.total_dwell,
            self.max_speed,
            self.length,
            self.acceleration,
            self.deceleration,
            if self.is_passenger { 1.0 } else { 0.0 },
            if self.is_up { 1.0 } else { 0.0 },
        ]
    }
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
