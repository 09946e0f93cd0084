//! Success scoring for candidate paths.
//!
//! The search only needs one capability from an estimator: turn a path
//! into a probability of the path working out in practice. This module
//! defines that seam and a couple of simple implementations; anything
//! smarter lives behind the same trait.

mod features;
mod linear;

use crate::domain::TrainPath;

pub use features::{FEATURE_COUNT, PathFeatures};
pub use linear::LinearPredictor;

/// Error from scoring a single path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    /// The estimator could not produce a score
    #[error("prediction failed: {0}")]
    Failed(String),

    /// The estimator did not answer in time
    #[error("prediction timed out")]
    Timeout,

    /// The estimator produced a value that is not a probability
    #[error("prediction produced invalid score {0}")]
    InvalidScore(f64),
}

/// Estimates how likely a path is to run successfully.
///
/// Implementations return a probability in `[0, 1]`. Failures are per call:
/// the caller decides how to recover, and one failure says nothing about
/// the next call.
pub trait SuccessPredictor: Send + Sync {
    fn score(&self, path: &TrainPath) -> Result<f64, PredictorError>;
}

impl<F> SuccessPredictor for F
where
    F: Fn(&TrainPath) -> Result<f64, PredictorError> + Send + Sync,
{
    fn score(&self, path: &TrainPath) -> Result<f64, PredictorError> {
        self(path)
    }
}

/// Scores every path identically.
///
/// With this predictor the ranking falls through to journey time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralPredictor {
    score: f64,
}

impl NeutralPredictor {
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl Default for NeutralPredictor {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl SuccessPredictor for NeutralPredictor {
    fn score(&self, _path: &TrainPath) -> Result<f64, PredictorError> {
        Ok(self.score)
    }
}
