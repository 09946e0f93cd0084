//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rand::Rng;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::domain::TrainPath;
use crate::network::{NetworkError, NetworkFixture};
use crate::planner::{ConflictChecker, Planner, SearchError, SearchRequest, find_crossings};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/network", get(network))
        .route("/paths/search", post(search_paths))
        .route("/paths/conflicts", post(audit_conflicts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Describe the corridor's sections and routes.
async fn network(State(state): State<AppState>) -> Json<NetworkFixture> {
    Json(state.network.to_fixture())
}

/// Search for a conflict-free path for a new train.
async fn search_paths(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchPathsResponse>, AppError> {
    let req: SearchPathsRequest = parse_body(&body)?;

    let config = req.config.unwrap_or_else(|| state.config.as_ref().clone());
    // Overrides come straight from the client; bound them before any work
    config.validate()?;
    let seed = req.seed.unwrap_or_else(|| rand::rng().random());
    let request = SearchRequest::new(Arc::new(req.train), req.start_time, req.existing_paths);

    info!(train = %request.train.id, seed, "path search requested");

    // The search is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let planner = Planner::new(&state.network, state.predictor.as_ref(), &config);
        planner.search_seeded(&request, seed)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })??;

    Ok(Json(SearchPathsResponse::from_result(&result, seed)))
}

/// Check a single path for crossings and headway violations.
async fn audit_conflicts(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConflictAuditResponse>, AppError> {
    let req: ConflictAuditRequest = parse_body(&body)?;

    let min_headway = req
        .min_headway_mins
        .unwrap_or(state.config.min_headway_mins);
    state
        .config
        .as_ref()
        .clone()
        .with_min_headway(min_headway)
        .validate()?;

    for path in std::iter::once(&req.candidate).chain(&req.existing_paths) {
        check_sections(&state, path)?;
    }

    let checker = ConflictChecker::new(min_headway);
    let conflicts = checker.check_conflicts(&req.candidate, &req.existing_paths);
    let crossings = find_crossings(&req.candidate, &req.existing_paths);

    debug!(
        train = %req.candidate.train().id,
        crossings = crossings.len(),
        conflicts = conflicts.len(),
        "audited path"
    );

    Ok(Json(ConflictAuditResponse {
        crosses: !crossings.is_empty(),
        crossings,
        conflicts,
    }))
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Reject paths over sections the network doesn't have.
fn check_sections(state: &AppState, path: &TrainPath) -> Result<(), AppError> {
    for entry in path.schedule() {
        state
            .network
            .section(&entry.section, path.direction())
            .map_err(SearchError::from)?;
    }
    Ok(())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            SearchError::Domain(_) | SearchError::Network(NetworkError::UnknownSection { .. }) => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, TrainService};
    use crate::network::Network;
    use crate::planner::SearchConfig;
    use crate::predict::NeutralPredictor;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(
            Network::demo_corridor().unwrap(),
            NeutralPredictor::default(),
            SearchConfig::default(),
        )
    }

    fn body(value: serde_json::Value) -> Bytes {
        Bytes::from(serde_json::to_vec(&value).unwrap())
    }

    fn train(direction: Direction) -> serde_json::Value {
        serde_json::to_value(TrainService::passenger(direction)).unwrap()
    }

    /// A single-section up path entering SEC1 at 08:MM.
    fn sec1_path(min: u32) -> serde_json::Value {
        json!({
            "train": train(Direction::Up),
            "schedule": [
                { "section": "SEC1", "time": format!("2024-03-15T08:{min:02}:00"), "dwell_mins": 0.0 }
            ],
            "speeds": [100.0],
            "platforms": [null],
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn network_lists_demo_corridor() {
        let Json(fixture) = network(State(state())).await;

        assert_eq!(fixture.sections.len(), 6);
        assert_eq!(fixture.routes.up.len(), 3);
    }

    #[tokio::test]
    async fn search_finds_path_on_empty_corridor() {
        let req = body(json!({
            "train": train(Direction::Up),
            "start_time": "2024-03-15T08:00:00",
            "seed": 42,
        }));

        let Json(response) = search_paths(State(state()), req).await.unwrap();

        assert!(response.best.is_some());
        assert_eq!(response.alternatives.len(), 4);
        assert_eq!(response.seed, 42);
    }

    #[tokio::test]
    async fn search_with_zero_attempts_reports_no_path() {
        let req = body(json!({
            "train": train(Direction::Down),
            "start_time": "2024-03-15T08:00:00",
            "config": { "max_attempts": 0 },
        }));

        let Json(response) = search_paths(State(state()), req).await.unwrap();

        assert!(response.best.is_none());
        assert_eq!(response.attempts, 0);
    }

    #[tokio::test]
    async fn search_rejects_oversized_config() {
        for config in [
            json!({ "workers": 10_000_000 }),
            json!({ "max_attempts": 1_000_000_000_000u64 }),
            json!({ "max_candidates": 1_000_000_000_000u64 }),
            json!({ "departure_window_mins": 1e12 }),
        ] {
            let req = body(json!({
                "train": train(Direction::Up),
                "start_time": "2024-03-15T08:00:00",
                "config": config,
            }));

            let err = search_paths(State(state()), req).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest { .. }));
        }
    }

    #[tokio::test]
    async fn search_rejects_overlong_dwell() {
        let mut long = train(Direction::Up);
        long["max_dwell_mins"] = json!(1e12);
        let req = body(json!({
            "train": long,
            "start_time": "2024-03-15T08:00:00",
        }));

        let err = search_paths(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn search_rejects_invalid_json() {
        let err = search_paths(State(state()), Bytes::from_static(b"{ nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn search_rejects_invalid_train() {
        let mut bad = train(Direction::Up);
        bad["max_speed_kmh"] = json!(-10.0);
        let req = body(json!({
            "train": bad,
            "start_time": "2024-03-15T08:00:00",
        }));

        let err = search_paths(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn audit_reports_headway_violation() {
        // Three minutes apart with a five minute headway
        let req = body(json!({
            "candidate": sec1_path(3),
            "existing_paths": [sec1_path(0)],
        }));

        let Json(response) = audit_conflicts(State(state()), req).await.unwrap();

        assert!(!response.crosses);
        assert_eq!(response.conflicts.len(), 1);
        assert!((response.conflicts[0].violation_mins - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn audit_uses_requested_headway() {
        let req = body(json!({
            "candidate": sec1_path(3),
            "existing_paths": [sec1_path(0)],
            "min_headway_mins": 2.0,
        }));

        let Json(response) = audit_conflicts(State(state()), req).await.unwrap();
        assert!(response.conflicts.is_empty());
    }

    #[tokio::test]
    async fn audit_rejects_negative_headway() {
        let req = body(json!({
            "candidate": sec1_path(3),
            "min_headway_mins": -1.0,
        }));

        let err = audit_conflicts(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn audit_rejects_overlong_headway() {
        let req = body(json!({
            "candidate": sec1_path(3),
            "min_headway_mins": 1e12,
        }));

        let err = audit_conflicts(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn audit_rejects_out_of_range_dwell() {
        let mut path = sec1_path(3);
        path["schedule"][0]["dwell_mins"] = json!(1e12);
        let req = body(json!({ "candidate": path }));

        let err = audit_conflicts(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn audit_rejects_unknown_section() {
        let mut path = sec1_path(3);
        path["schedule"][0]["section"] = json!("SEC9");
        let req = body(json!({ "candidate": path }));

        let err = audit_conflicts(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn audit_rejects_malformed_path() {
        let mut path = sec1_path(3);
        path["speeds"] = json!([]);
        let req = body(json!({ "candidate": path }));

        let err = audit_conflicts(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[test]
    fn error_status_codes() {
        let bad = AppError::BadRequest {
            message: "nope".to_string(),
        };
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let internal = AppError::from(SearchError::Network(NetworkError::NoRoute(
            Direction::Up,
        )));
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let worker = AppError::from(SearchError::Worker("out of threads".to_string()));
        assert_eq!(
            worker.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
