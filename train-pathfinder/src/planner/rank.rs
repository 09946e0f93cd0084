//! Candidate ranking for search results.
//!
//! Feasible candidates are scored by a success predictor and the best one
//! is picked out; the rest are returned as alternatives, quickest first.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::warn;

use crate::domain::TrainPath;
use crate::predict::SuccessPredictor;

/// Score given to a candidate the predictor couldn't score.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// A candidate path with its success score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPath {
    pub path: TrainPath,
    pub score: f64,
}

impl ScoredPath {
    pub fn journey_mins(&self) -> f64 {
        self.path.journey_mins()
    }
}

/// Ranked candidates: the best path and the remaining alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub best: Option<ScoredPath>,

    /// Every other candidate, by ascending journey time.
    pub alternatives: Vec<ScoredPath>,
}

/// Score one path, falling back to [`NEUTRAL_SCORE`] on failure.
///
/// Finite scores outside `[0, 1]` are clamped; non-finite scores are
/// treated as failures.
pub fn score_path<P: SuccessPredictor + ?Sized>(path: &TrainPath, predictor: &P) -> f64 {
    match predictor.score(path) {
        Ok(score) if score.is_finite() => score.clamp(0.0, 1.0),
        Ok(score) => {
            warn!(train = %path.train().id, score, "predictor returned non-finite score");
            NEUTRAL_SCORE
        }
        Err(e) => {
            warn!(train = %path.train().id, error = %e, "predictor failed, using neutral score");
            NEUTRAL_SCORE
        }
    }
}

/// Pick the best candidate and order the rest.
///
/// Best is the highest score, ties going to the shorter journey and then
/// the earlier start. Alternatives are sorted by journey time, then start.
pub fn select_best<P: SuccessPredictor + ?Sized>(
    candidates: Vec<TrainPath>,
    predictor: &P,
) -> Selection {
    let mut scored: Vec<ScoredPath> = candidates
        .into_iter()
        .map(|path| {
            let score = score_path(&path, predictor);
            ScoredPath { path, score }
        })
        .collect();

    let best_index = scored
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| by_preference(a, b))
        .map(|(i, _)| i);

    let Some(best_index) = best_index else {
        return Selection::default();
    };

    let best = scored.swap_remove(best_index);
    scored.sort_by(by_journey_time);

    Selection {
        best: Some(best),
        alternatives: scored,
    }
}

/// Most preferred first.
fn by_preference(a: &ScoredPath, b: &ScoredPath) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| by_journey_time(a, b))
}

fn by_journey_time(a: &ScoredPath, b: &ScoredPath) -> Ordering {
    a.path
        .journey_time()
        .cmp(&b.path.journey_time())
        .then_with(|| a.path.start_time().cmp(&b.path.start_time()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Direction, ScheduleEntry, SectionId, TrainService};
    use crate::predict::PredictorError;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn make_path(start: u16, journey: u16, dwell_pct: u8) -> TrainPath {
        let base = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let time = base + Duration::minutes(i64::from(start));
        // Encode the score into the first dwell so the predictor can read it
        let dwell = f64::from(dwell_pct) / 100.0;
        TrainPath::new(
            Arc::new(TrainService::freight(Direction::Down)),
            vec![
                ScheduleEntry::new(SectionId::parse("SEC3").unwrap(), time, dwell),
                ScheduleEntry::new(
                    SectionId::parse("SEC2").unwrap(),
                    time + Duration::minutes(1),
                    f64::from(journey),
                ),
            ],
            vec![80.0, 80.0],
            vec![None, None],
        )
        .unwrap()
    }

    fn dwell_score(path: &TrainPath) -> Result<f64, PredictorError> {
        Ok(path.schedule()[0].dwell_mins)
    }

    fn candidates() -> impl Strategy<Value = Vec<TrainPath>> {
        prop::collection::vec(
            (0u16..120, 1u16..90, 0u8..=100).prop_map(|(s, j, d)| make_path(s, j, d)),
            0..12,
        )
    }

    proptest! {
        /// Nothing is lost or duplicated
        #[test]
        fn selection_preserves_candidates(paths in candidates()) {
            let n = paths.len();
            let selection = select_best(paths, &dwell_score);
            let selected = selection.alternatives.len() + usize::from(selection.best.is_some());
            prop_assert_eq!(selected, n);
        }

        /// No alternative beats the best
        #[test]
        fn best_dominates_alternatives(paths in candidates()) {
            let selection = select_best(paths, &dwell_score);
            if let Some(best) = &selection.best {
                for alt in &selection.alternatives {
                    prop_assert!(alt.score <= best.score);
                    if alt.score == best.score {
                        prop_assert!(alt.path.journey_time() >= best.path.journey_time());
                    }
                }
            }
        }

        #[test]
        fn alternatives_are_sorted(paths in candidates()) {
            let selection = select_best(paths, &dwell_score);
            for pair in selection.alternatives.windows(2) {
                prop_assert!(pair[0].path.journey_time() <= pair[1].path.journey_time());
            }
        }
    }
}
