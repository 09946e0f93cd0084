//! Application state for the web layer.

use std::sync::Arc;

use crate::network::Network;
use crate::planner::SearchConfig;
use crate::predict::SuccessPredictor;

/// Shared application state.
///
/// Everything here is read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    /// Corridor the server plans paths over
    pub network: Arc<Network>,

    /// Scorer for candidate paths
    pub predictor: Arc<dyn SuccessPredictor>,

    /// Default search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        network: Network,
        predictor: impl SuccessPredictor + 'static,
        config: SearchConfig,
    ) -> Self {
        Self {
            network: Arc::new(network),
            predictor: Arc::new(predictor),
            config: Arc::new(config),
        }
    }
}
