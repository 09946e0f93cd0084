//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{TrainPath, TrainService};
use crate::planner::{ConflictRecord, Crossing, ScoredPath, SearchConfig, SearchResult};

/// Request to search for a path for a new train.
#[derive(Debug, Deserialize)]
pub struct SearchPathsRequest {
    /// The train to be pathed
    pub train: TrainService,

    /// Earliest departure
    pub start_time: NaiveDateTime,

    /// Paths already in the timetable
    #[serde(default)]
    pub existing_paths: Vec<TrainPath>,

    /// Seed for reproducible searches (random if omitted)
    pub seed: Option<u64>,

    /// Overrides for the server's search configuration
    pub config: Option<SearchConfig>,
}

/// A ranked path in search results.
#[derive(Debug, Serialize)]
pub struct PathResult {
    pub train_id: String,

    /// Predicted probability of success
    pub score: f64,

    /// Entry into the first section
    pub start_time: String,

    /// Departure from the last section
    pub end_time: String,

    pub journey_mins: f64,
    pub total_dwell_mins: f64,

    /// The full path, suitable for passing back as an existing path
    pub path: TrainPath,
}

/// Response for path search.
#[derive(Debug, Serialize)]
pub struct SearchPathsResponse {
    /// Best path, or null if no feasible path was found
    pub best: Option<PathResult>,

    /// Other feasible paths, quickest first
    pub alternatives: Vec<PathResult>,

    pub attempts: usize,
    pub rejected_crossing: usize,
    pub rejected_headway: usize,
    pub cancelled: bool,

    /// Seed the search ran with
    pub seed: u64,
}

/// Request to check one path against existing traffic.
#[derive(Debug, Deserialize)]
pub struct ConflictAuditRequest {
    pub candidate: TrainPath,

    #[serde(default)]
    pub existing_paths: Vec<TrainPath>,

    /// Headway to check against (server default if omitted)
    pub min_headway_mins: Option<f64>,
}

/// Response for a conflict audit.
#[derive(Debug, Serialize)]
pub struct ConflictAuditResponse {
    /// Whether the candidate crosses any opposite-direction path
    pub crosses: bool,

    pub crossings: Vec<Crossing>,

    /// Headway violations against same-direction paths
    pub conflicts: Vec<ConflictRecord>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Conversion implementations

impl PathResult {
    /// Convert a scored path to a result DTO.
    pub fn from_scored(scored: &ScoredPath) -> Self {
        let path = &scored.path;
        Self {
            train_id: path.train().id.clone(),
            score: scored.score,
            start_time: format_time(&path.start_time()),
            end_time: format_time(&path.end_time()),
            journey_mins: path.journey_mins(),
            total_dwell_mins: path.total_dwell_mins(),
            path: path.clone(),
        }
    }
}

impl SearchPathsResponse {
    /// Convert a search result to a response DTO.
    pub fn from_result(result: &SearchResult, seed: u64) -> Self {
        Self {
            best: result.best.as_ref().map(PathResult::from_scored),
            alternatives: result
                .alternatives
                .iter()
                .map(PathResult::from_scored)
                .collect(),
            attempts: result.attempts,
            rejected_crossing: result.rejected_crossing,
            rejected_headway: result.rejected_headway,
            cancelled: result.cancelled,
            seed,
        }
    }
}

/// Format a time for display, to the second.
fn format_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
