//! Path search orchestration.
//!
//! Validates a request, generates feasible candidates under the attempt
//! budget (optionally across several seeded workers), and ranks them.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{DomainError, TrainPath, TrainService};
use crate::network::{Network, NetworkError};
use crate::predict::SuccessPredictor;

use super::config::{MAX_WORKERS, SearchConfig};
use super::generate::{CandidateGenerator, GenerationOutcome};
use super::rank::{ScoredPath, select_best};

/// Error from path search.
///
/// Finding no feasible path is not an error; see [`SearchResult::found`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request or configuration
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The network doesn't describe the route being searched
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A path could not be built
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A parallel search worker thread could not be started
    #[error("failed to start search worker: {0}")]
    Worker(String),
}

/// Request for a path for one new train.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The train to be pathed.
    pub train: Arc<TrainService>,

    /// Earliest departure; candidates leave within the configured window
    /// after this.
    pub start_time: NaiveDateTime,

    /// Paths already in the timetable. Never modified.
    pub existing_paths: Vec<TrainPath>,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        train: Arc<TrainService>,
        start_time: NaiveDateTime,
        existing_paths: Vec<TrainPath>,
    ) -> Self {
        Self {
            train,
            start_time,
            existing_paths,
        }
    }

    /// Validate the request against the network.
    ///
    /// Unknown sections anywhere in the existing paths fail the whole
    /// request rather than being skipped.
    pub fn validate(&self, network: &Network) -> Result<(), SearchError> {
        self.train
            .validate()
            .map_err(|e| SearchError::InvalidRequest(e.to_string()))?;

        network.route(self.train.direction)?;

        for path in &self.existing_paths {
            for entry in path.schedule() {
                network.section(&entry.section, path.direction())?;
            }
        }

        Ok(())
    }
}

/// Result of path search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// Highest-scoring feasible path, if any was found.
    pub best: Option<ScoredPath>,

    /// Other feasible paths, by ascending journey time.
    pub alternatives: Vec<ScoredPath>,

    /// Number of candidates proposed.
    pub attempts: usize,

    pub rejected_crossing: usize,
    pub rejected_headway: usize,

    /// Whether the search was stopped before its budget ran out.
    pub cancelled: bool,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if a feasible path was found.
    pub fn found(&self) -> bool {
        self.best.is_some()
    }
}

/// Conflict-free path planner.
pub struct Planner<'a, P: SuccessPredictor + ?Sized> {
    network: &'a Network,
    predictor: &'a P,
    config: &'a SearchConfig,
    stop: Option<&'a AtomicBool>,
}

impl<'a, P: SuccessPredictor + ?Sized> Planner<'a, P> {
    /// Create a new planner.
    pub fn new(network: &'a Network, predictor: &'a P, config: &'a SearchConfig) -> Self {
        Self {
            network,
            predictor,
            config,
            stop: None,
        }
    }

    /// Stop generating candidates once `stop` is set.
    ///
    /// Candidates found before the flag was seen are still ranked.
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Search for a path, drawing randomness from `rng`.
    pub fn search<R: Rng + ?Sized>(
        &self,
        request: &SearchRequest,
        rng: &mut R,
    ) -> Result<SearchResult, SearchError> {
        self.config.validate()?;
        request.validate(self.network)?;

        info!(
            train = %request.train.id,
            direction = %request.train.direction,
            start = %request.start_time,
            existing = request.existing_paths.len(),
            "searching for path"
        );

        let outcome = self.generator().generate(
            &request.train,
            request.start_time,
            &request.existing_paths,
            self.config.max_candidates,
            self.config.max_attempts,
            rng,
        )?;

        Ok(self.rank(outcome))
    }

    /// Search reproducibly from a seed.
    ///
    /// Runs on `config.workers` threads when more than one is configured.
    pub fn search_seeded(
        &self,
        request: &SearchRequest,
        seed: u64,
    ) -> Result<SearchResult, SearchError> {
        if self.config.workers > 1 {
            self.search_parallel(request, seed, self.config.workers)
        } else {
            self.search(request, &mut StdRng::seed_from_u64(seed))
        }
    }

    /// Search with the attempt budget split across `workers` threads.
    ///
    /// Worker `i` is seeded with `seed ^ i`, so results depend only on the
    /// seed and the worker count. Candidates are merged in worker order and
    /// cut to `max_candidates` before ranking.
    pub fn search_parallel(
        &self,
        request: &SearchRequest,
        seed: u64,
        workers: usize,
    ) -> Result<SearchResult, SearchError> {
        if !(1..=MAX_WORKERS).contains(&workers) {
            return Err(SearchError::InvalidRequest(format!(
                "workers must be within 1..={MAX_WORKERS}"
            )));
        }
        self.config.validate()?;
        request.validate(self.network)?;

        info!(
            train = %request.train.id,
            start = %request.start_time,
            workers,
            seed,
            "searching for path in parallel"
        );

        let generator = self.generator();
        let max_candidates = self.config.max_candidates;
        let per_worker = self.config.max_attempts / workers;
        let remainder = self.config.max_attempts % workers;

        let outcomes: Vec<Result<GenerationOutcome, SearchError>> = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for worker in 0..workers {
                let generator = &generator;
                let attempts = per_worker + usize::from(worker < remainder);
                let spawned = std::thread::Builder::new()
                    .name(format!("search-{worker}"))
                    .spawn_scoped(scope, move || {
                        let mut rng = StdRng::seed_from_u64(seed ^ worker as u64);
                        generator.generate(
                            &request.train,
                            request.start_time,
                            &request.existing_paths,
                            max_candidates,
                            attempts,
                            &mut rng,
                        )
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        // Workers already running finish when the scope ends
                        warn!(worker, error = %e, "failed to spawn search worker");
                        return vec![Err(SearchError::Worker(e.to_string()))];
                    }
                }
            }

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        let mut merged = GenerationOutcome::default();
        for outcome in outcomes {
            merged.merge(outcome?);
        }
        merged.candidates.truncate(max_candidates);

        Ok(self.rank(merged))
    }

    fn generator(&self) -> CandidateGenerator<'a> {
        let generator = CandidateGenerator::new(self.network, self.config);
        match self.stop {
            Some(stop) => generator.with_stop_flag(stop),
            None => generator,
        }
    }

    fn rank(&self, outcome: GenerationOutcome) -> SearchResult {
        let feasible = outcome.candidates.len();
        let selection = select_best(outcome.candidates, self.predictor);

        match &selection.best {
            Some(best) => info!(
                feasible,
                attempts = outcome.attempts,
                score = best.score,
                journey_mins = best.journey_mins(),
                "path found"
            ),
            None => info!(
                attempts = outcome.attempts,
                rejected_crossing = outcome.rejected_crossing,
                rejected_headway = outcome.rejected_headway,
                cancelled = outcome.cancelled,
                "no feasible path"
            ),
        }
        debug!(alternatives = selection.alternatives.len(), "ranked candidates");

        SearchResult {
            best: selection.best,
            alternatives: selection.alternatives,
            attempts: outcome.attempts,
            rejected_crossing: outcome.rejected_crossing,
            rejected_headway: outcome.rejected_headway,
            cancelled: outcome.cancelled,
        }
    }
}
