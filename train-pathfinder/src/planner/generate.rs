//! Stochastic candidate path generation.
//!
//! Each attempt draws a departure offset, one speed factor for the whole
//! corridor and a dwell per platformed section, then lays the train out
//! section by section along its directional route. Only candidates that
//! neither cross nor break headway against the existing paths are kept.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, trace};

use crate::domain::{ScheduleEntry, TrainPath, TrainService, add_minutes};
use crate::network::Network;

use super::config::SearchConfig;
use super::conflict::ConflictChecker;
use super::crossing::crosses;
use super::search::SearchError;

/// Feasible candidates from one generation run, with attempt accounting.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    /// Accepted candidates, in the order they were generated.
    pub candidates: Vec<TrainPath>,

    /// Number of candidates proposed.
    pub attempts: usize,

    /// Proposals rejected for crossing an opposite-direction path.
    pub rejected_crossing: usize,

    /// Proposals rejected for breaking headway.
    pub rejected_headway: usize,

    /// Whether generation stopped early on request.
    pub cancelled: bool,
}

impl GenerationOutcome {
    /// Fold another outcome into this one, appending its candidates.
    pub fn merge(&mut self, other: GenerationOutcome) {
        self.candidates.extend(other.candidates);
        self.attempts += other.attempts;
        self.rejected_crossing += other.rejected_crossing;
        self.rejected_headway += other.rejected_headway;
        self.cancelled |= other.cancelled;
    }
}

/// Proposes candidate paths for a train over the network.
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
    checker: ConflictChecker,
    stop: Option<&'a AtomicBool>,
}

impl<'a> CandidateGenerator<'a> {
    /// Create a generator sampling within `config`'s ranges.
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self {
            network,
            config,
            checker: ConflictChecker::new(config.min_headway_mins),
            stop: None,
        }
    }

    /// Stop issuing attempts once `stop` is set.
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Build one candidate path, without checking it against other traffic.
    ///
    /// Fails if the train's route references a section the network doesn't
    /// know, or if the train's timings would run the schedule past
    /// representable time.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        train: &Arc<TrainService>,
        start_time: NaiveDateTime,
        rng: &mut R,
    ) -> Result<TrainPath, SearchError> {
        let direction = train.direction;
        let route = self.network.route(direction)?;

        let offset = sample(rng, 0.0, self.config.departure_window_mins);
        let speed_factor = sample(
            rng,
            self.config.speed_factor_min,
            self.config.speed_factor_max,
        );
        let max_dwell = (train.max_dwell_mins * self.config.dwell_scale).max(train.min_dwell_mins);

        let mut schedule = Vec::with_capacity(route.len());
        let mut speeds = Vec::with_capacity(route.len());
        let mut platforms = Vec::with_capacity(route.len());
        let mut time = advance(start_time, offset)?;

        for section_id in route {
            let section = self.network.section(section_id, direction)?;

            let speed = train.max_speed_kmh.min(section.max_speed_kmh) * speed_factor;
            let running_mins = section.length_km / speed * 60.0;

            let dwell = if section.has_platforms() {
                sample(rng, train.min_dwell_mins, max_dwell)
            } else {
                0.0
            };
            let platform = if dwell > 0.0 {
                section.platforms.choose(rng).cloned()
            } else {
                None
            };

            schedule.push(ScheduleEntry::new(section_id.clone(), time, dwell));
            speeds.push(speed);
            platforms.push(platform);

            time = advance(advance(time, dwell)?, running_mins)?;
        }

        Ok(TrainPath::new(train.clone(), schedule, speeds, platforms)?)
    }

    /// Generate up to `max_candidates` feasible paths in at most
    /// `max_attempts` proposals.
    ///
    /// Finding nothing is not an error: the outcome simply has no
    /// candidates.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        train: &Arc<TrainService>,
        start_time: NaiveDateTime,
        existing: &[TrainPath],
        max_candidates: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<GenerationOutcome, SearchError> {
        let mut outcome = GenerationOutcome::default();

        while outcome.candidates.len() < max_candidates && outcome.attempts < max_attempts {
            if self.stop_requested() {
                debug!(train = %train.id, attempts = outcome.attempts, "generation cancelled");
                outcome.cancelled = true;
                break;
            }

            outcome.attempts += 1;
            let candidate = self.propose(train, start_time, rng)?;

            if crosses(&candidate, existing) {
                trace!(attempt = outcome.attempts, "candidate crosses existing path");
                outcome.rejected_crossing += 1;
                continue;
            }

            if self.checker.has_conflicts(&candidate, existing) {
                trace!(attempt = outcome.attempts, "candidate breaks headway");
                outcome.rejected_headway += 1;
                continue;
            }

            trace!(
                attempt = outcome.attempts,
                start = %candidate.start_time(),
                journey_mins = candidate.journey_mins(),
                "accepted candidate"
            );
            outcome.candidates.push(candidate);
        }

        debug!(
            train = %train.id,
            accepted = outcome.candidates.len(),
            attempts = outcome.attempts,
            rejected_crossing = outcome.rejected_crossing,
            rejected_headway = outcome.rejected_headway,
            "generation finished"
        );

        Ok(outcome)
    }

    fn stop_requested(&self) -> bool {
        self.stop.is_some_and(|stop| stop.load(Ordering::Relaxed))
    }
}

/// Move a schedule clock forward by fractional minutes.
fn advance(time: NaiveDateTime, mins: f64) -> Result<NaiveDateTime, SearchError> {
    add_minutes(time, mins).ok_or_else(|| {
        SearchError::InvalidRequest(format!(
            "schedule runs out of range {mins} minutes after {time}"
        ))
    })
}

/// Uniform sample from `[lo, hi]`, or `lo` if the range is empty or
/// unbounded.
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}
