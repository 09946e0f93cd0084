//! Logistic scoring over path features.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FEATURE_COUNT, PathFeatures, PredictorError, SuccessPredictor};
use crate::domain::TrainPath;

/// A logistic model: `sigmoid(weights · features + bias)`.
///
/// Weights are fitted elsewhere and loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPredictor {
    pub weights: [f64; FEATURE_COUNT],
    #[serde(default)]
    pub bias: f64,
}

impl LinearPredictor {
    pub fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Parse weights from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, PredictorError> {
        serde_json::from_str(json).map_err(|e| PredictorError::Failed(e.to_string()))
    }

    /// Load weights from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PredictorError::Failed(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    fn logit(&self, features: &PathFeatures) -> f64 {
        self.weights
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

impl SuccessPredictor for LinearPredictor {
    fn score(&self, path: &TrainPath) -> Result<f64, PredictorError> {
        let logit = self.logit(&PathFeatures::extract(path));
        if !logit.is_finite() {
            return Err(PredictorError::InvalidScore(logit));
        }
        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}
